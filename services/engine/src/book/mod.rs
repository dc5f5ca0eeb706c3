//! Two-sided resting-order book
//!
//! Holds only OPEN limit orders, referenced by id; the full order records
//! live in the market's flat store. Candidate iteration order is the sole
//! source of price-time priority and is deterministic: price first, then
//! ascending order id.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

use types::ids::{OrderId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use ask_book::AskBook;
use bid_book::BidBook;

/// A resting order yielded as a match candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maker {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub price: Price,
    pub remaining: Quantity,
}

/// Two-sided book for one symbol
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    bids: BidBook,
    asks: AskBook,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an open limit order at its full remaining quantity
    pub fn insert(&mut self, order: &Order) {
        match order.side {
            Side::Buy => self.bids.insert(order.order_id, order.user_id, order.limit_price, order.remaining),
            Side::Sell => self.asks.insert(order.order_id, order.user_id, order.limit_price, order.remaining),
        }
    }

    /// Remove a resting order outright (cancellation)
    pub fn remove(&mut self, order_id: &OrderId, side: Side, price: Price) -> bool {
        match side {
            Side::Buy => self.bids.remove(order_id, price),
            Side::Sell => self.asks.remove(order_id, price),
        }
    }

    /// Decrease a resting order's quantity after a fill; the book entry is
    /// dropped when it reaches zero
    pub fn decrement(&mut self, order_id: &OrderId, side: Side, price: Price, qty: Quantity) -> bool {
        match side {
            Side::Buy => self.bids.decrement(order_id, price, qty),
            Side::Sell => self.asks.decrement(order_id, price, qty),
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_bid()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_ask()
    }

    /// Opposite-side orders that could cross `taker_side` bounded at
    /// `limit`, in match priority order. No bound (market) yields the whole
    /// opposite side.
    pub fn iter_matching<'a>(
        &'a self,
        taker_side: Side,
        limit: Option<Price>,
    ) -> Box<dyn Iterator<Item = Maker> + 'a> {
        match taker_side {
            Side::Buy => Box::new(self.asks.candidates(limit).map(|(price, entry)| Maker {
                order_id: entry.order_id,
                user_id: entry.user_id,
                price,
                remaining: entry.remaining,
            })),
            Side::Sell => Box::new(self.bids.candidates(limit).map(|(price, entry)| Maker {
                order_id: entry.order_id,
                user_id: entry.user_id,
                price,
                remaining: entry.remaining,
            })),
        }
    }

    /// Aggregated bid depth, best price first
    pub fn bid_depth(&self) -> Vec<(Price, Quantity)> {
        self.bids.depth()
    }

    /// Aggregated ask depth, best price first
    pub fn ask_depth(&self) -> Vec<(Price, Quantity)> {
        self.asks.depth()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.bids.order_count() + self.asks.order_count()
    }
}
