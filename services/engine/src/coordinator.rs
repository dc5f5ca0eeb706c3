//! Order coordinator
//!
//! `Exchange` is the facade over the ledger, the registry and the books.
//! Each submission or cancellation runs entirely inside its symbol's
//! critical section: validation, reservation, book insertion, matching,
//! settlement and reconciliation commit together or not at all. Clients
//! observe a submission as atomic; a rejection leaves no state change.
//!
//! Marketable limit orders are rejected outright (CROSSES_BOOK) rather than
//! executed as takers, so at rest the best bid is always below the best ask
//! and only market orders take liquidity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use types::errors::ExchangeError;
use types::ids::{OrderId, SymbolId, TradeId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderType, Side};
use types::symbol::PriceDirection;
use types::trade::Trade;
use types::user::User;

use crate::ledger::Ledger;
use crate::matching::{self, crossing, ProposedFill};
use crate::registry::{Market, Registry};

/// How many executions a recent-trades query returns
pub const RECENT_TRADES: usize = 20;

/// A submission as it arrives from the boundary, before validation
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub symbol_id: SymbolId,
    pub side: Side,
    pub order_type: OrderType,
    pub price: Option<Decimal>,
    pub quantity: u64,
}

/// Submission outcome reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmitStatus {
    Open,
    Partial,
    Filled,
}

/// One execution of the submission, as reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillSummary {
    pub price: Price,
    pub quantity: Quantity,
}

/// Result of an accepted submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    /// Present for limit orders only; market orders never rest
    pub order_id: Option<OrderId>,
    pub status: SubmitStatus,
    pub fills: Vec<FillSummary>,
}

/// Aggregated view of one symbol's book
#[derive(Debug, Clone)]
pub struct BookSnapshot {
    pub symbol: String,
    pub last_price: Option<Price>,
    pub direction: PriceDirection,
    /// Per-level (price, quantity), best (highest) bid first
    pub buy_orders: Vec<(Price, Quantity)>,
    /// Per-level (price, quantity), best (lowest) ask first
    pub sell_orders: Vec<(Price, Quantity)>,
}

/// One non-zero position, resolved to its ticker
#[derive(Debug, Clone, PartialEq)]
pub struct PositionView {
    pub symbol_id: SymbolId,
    pub ticker: String,
    pub quantity: i64,
}

/// Account summary with holdings
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub positions: Vec<PositionView>,
}

/// The exchange facade
///
/// Tests inject a fresh instance; there is no global state.
pub struct Exchange {
    pub(crate) ledger: Ledger,
    pub(crate) registry: Registry,
    /// Which symbol a limit order belongs to, for cancellation routing
    pub(crate) order_index: DashMap<OrderId, SymbolId>,
    next_order_id: AtomicU64,
    next_trade_id: AtomicU64,
}

impl Exchange {
    pub fn new() -> Self {
        Self {
            ledger: Ledger::new(),
            registry: Registry::new(),
            order_index: DashMap::new(),
            next_order_id: AtomicU64::new(1),
            next_trade_id: AtomicU64::new(1),
        }
    }

    /// Cash and position state, read-only from the outside
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Submit an order
    ///
    /// Either the submission is rejected with no state change, or it
    /// commits atomically with its fills settled.
    pub fn submit(&self, user_id: UserId, req: SubmitRequest) -> Result<SubmitOutcome, ExchangeError> {
        if req.quantity == 0 {
            return Err(ExchangeError::invalid("quantity must be at least 1"));
        }
        let quantity = Quantity::new(req.quantity);

        let price = match (req.order_type, req.price) {
            (OrderType::Limit, Some(raw)) => Some(Price::try_new(raw).ok_or_else(|| {
                ExchangeError::invalid("limit price must be positive with at most 2 decimal places")
            })?),
            (OrderType::Limit, None) => {
                return Err(ExchangeError::invalid("limit orders require a price"))
            }
            (OrderType::Market, Some(_)) => {
                return Err(ExchangeError::invalid("market orders must not carry a price"))
            }
            (OrderType::Market, None) => None,
        };

        if !self.ledger.contains_user(&user_id) {
            return Err(ExchangeError::UnknownUser);
        }

        let market = self
            .registry
            .market(&req.symbol_id)
            .ok_or(ExchangeError::UnknownSymbol)?;
        let mut m = market
            .lock()
            .map_err(|_| ExchangeError::Internal("market lock poisoned".into()))?;

        match price {
            Some(limit) => self.submit_limit(&mut m, user_id, req.side, limit, quantity),
            None => self.submit_market(&mut m, user_id, req.side, quantity),
        }
    }

    /// Place a resting limit order
    fn submit_limit(
        &self,
        m: &mut Market,
        user_id: UserId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<SubmitOutcome, ExchangeError> {
        // A limit that would execute immediately is the caller's cue to use
        // a market order; rejecting it keeps best_bid < best_ask at rest.
        let best_opposite = match side {
            Side::Buy => m.book.best_ask(),
            Side::Sell => m.book.best_bid(),
        };
        if let Some(resting) = best_opposite {
            if crossing::incoming_can_match(side, price, resting) {
                return Err(ExchangeError::CrossesBook);
            }
        }

        let short_reserved = match side {
            Side::Buy => {
                self.ledger.reserve_cash(&user_id, price.notional(quantity))?;
                Quantity::zero()
            }
            Side::Sell => {
                let overhang = self.short_overhang(&user_id, m, quantity)?;
                if !overhang.is_zero() {
                    // Collateral is fixed here at the limit price and never
                    // revalued afterwards.
                    self.ledger.reserve_cash(&user_id, price.notional(overhang))?;
                }
                overhang
            }
        };

        let order_id = OrderId::new(self.next_order_id.fetch_add(1, Ordering::SeqCst));
        let order = Order::new_limit(
            order_id,
            user_id,
            m.symbol.symbol_id,
            side,
            price,
            quantity,
            short_reserved,
            now_nanos(),
        );
        m.book.insert(&order);
        m.orders.insert(order_id, order);
        self.order_index.insert(order_id, m.symbol.symbol_id);

        // Cross-prevention left nothing on the opposite side that this
        // order could reach, so the reduction is a formality.
        let plan = matching::match_incoming(quantity, None, m.book.iter_matching(side, Some(price)));
        debug_assert!(plan.is_empty(), "accepted limit orders cannot be marketable");

        debug!(
            order_id = order_id.as_u64(),
            symbol = %m.symbol.ticker,
            ?side,
            %price,
            %quantity,
            "limit order resting"
        );

        Ok(SubmitOutcome {
            order_id: Some(order_id),
            status: SubmitStatus::Open,
            fills: Vec::new(),
        })
    }

    /// Execute a market order against the book
    fn submit_market(
        &self,
        m: &mut Market,
        user_id: UserId,
        side: Side,
        quantity: Quantity,
    ) -> Result<SubmitOutcome, ExchangeError> {
        let cash_cap = match side {
            Side::Buy => Some(self.ledger.cash(&user_id)?),
            Side::Sell => {
                let overhang = self.short_overhang(&user_id, m, quantity)?;
                if !overhang.is_zero() {
                    // No reservation for market orders; the overhang is
                    // priced at the last print, or the best bid before the
                    // first one.
                    let reference = m
                        .symbol
                        .last_price
                        .or_else(|| m.book.best_bid())
                        .ok_or(ExchangeError::NoLiquidity)?;
                    if self.ledger.cash(&user_id)? < reference.notional(overhang) {
                        return Err(ExchangeError::InsufficientFunds);
                    }
                }
                None
            }
        };

        let plan = matching::match_incoming(quantity, cash_cap, m.book.iter_matching(side, None));
        if plan.is_empty() {
            return Err(ExchangeError::NoLiquidity);
        }

        let fills = self.settle(m, user_id, side, None, &plan.fills)?;
        if fills.is_empty() {
            // The cash snapshot was consumed by a parallel settlement on
            // another symbol before the first fill could commit.
            return Err(ExchangeError::InsufficientFunds);
        }

        let filled: u64 = fills.iter().map(|f| f.quantity.as_u64()).sum();
        let status = if filled == quantity.as_u64() {
            SubmitStatus::Filled
        } else {
            SubmitStatus::Partial
        };

        info!(
            symbol = %m.symbol.ticker,
            ?side,
            %quantity,
            filled,
            trades = fills.len(),
            "market order executed"
        );

        Ok(SubmitOutcome {
            order_id: None,
            status,
            fills,
        })
    }

    /// Short overhang of a sell: the quantity not covered by the current
    /// position, bounded by the outstanding float
    fn short_overhang(
        &self,
        user_id: &UserId,
        m: &Market,
        quantity: Quantity,
    ) -> Result<Quantity, ExchangeError> {
        let position = self.ledger.position(user_id, &m.symbol.symbol_id);
        let owned = position.max(0) as u64;
        let overhang = quantity.as_u64().saturating_sub(owned);
        if overhang > m.symbol.outstanding.as_u64() {
            return Err(ExchangeError::InsufficientSharesInCirculation);
        }
        Ok(Quantity::new(overhang))
    }

    /// Apply a match plan: transfer shares and cash, decrement makers,
    /// record trades, stamp prices
    ///
    /// Returns the fills that actually committed. A market buy stops early
    /// instead of overdrawing if the taker's balance shrank between the
    /// cash snapshot and a fill (a settlement on another symbol).
    fn settle(
        &self,
        m: &mut Market,
        taker_user: UserId,
        taker_side: Side,
        taker_order_id: Option<OrderId>,
        fills: &[ProposedFill],
    ) -> Result<Vec<FillSummary>, ExchangeError> {
        let symbol_id = m.symbol.symbol_id;
        let maker_side = taker_side.opposite();
        let mut applied = Vec::new();

        for fill in fills {
            let maker_id = fill.maker.order_id;
            let price = fill.maker.price;
            let qty = fill.quantity;
            let value = price.notional(qty);

            let (buyer, seller, buy_order_id, sell_order_id) = match taker_side {
                Side::Buy => (taker_user, fill.maker.user_id, taker_order_id, Some(maker_id)),
                Side::Sell => (fill.maker.user_id, taker_user, Some(maker_id), taker_order_id),
            };

            // Cash legs. A buying taker pays per fill; a buying maker
            // already paid through its reservation, which is consumed here,
            // with any difference between the reserved price and the trade
            // price returned to the buyer. Makers rest at the trade price,
            // so the difference is zero unless the execution model changes.
            match taker_side {
                Side::Buy => {
                    if self.ledger.reserve_cash(&buyer, value).is_err() {
                        break;
                    }
                }
                Side::Sell => {
                    let maker_order = m
                        .orders
                        .get(&maker_id)
                        .ok_or_else(|| ExchangeError::Internal("maker missing from store".into()))?;
                    let reserved_price = maker_order.limit_price;
                    let improvement = reserved_price.as_decimal() - price.as_decimal();
                    if improvement > Decimal::ZERO {
                        self.ledger
                            .credit_cash(&buyer, improvement * qty.as_decimal())?;
                    }
                }
            }
            self.ledger.credit_cash(&seller, value)?;

            // Share legs. A self-trade adjusts the same row twice and nets
            // to zero.
            self.ledger.adjust_position(buyer, symbol_id, qty.as_u64() as i64);
            self.ledger.adjust_position(seller, symbol_id, -(qty.as_u64() as i64));

            // Maker bookkeeping
            let maker_order = m
                .orders
                .get_mut(&maker_id)
                .ok_or_else(|| ExchangeError::Internal("maker missing from store".into()))?;
            let short_before = maker_order.remaining_short();
            maker_order.fill(qty);
            let consumed_short = short_before - maker_order.remaining_short();
            m.book.decrement(&maker_id, maker_side, price, qty);

            // For a fill against the owner's own resting short sell, the
            // proceeds that normally stand in for the consumed collateral
            // are self-paid, so the collateral comes back instead. Without
            // this the pair of legs would not be cash-neutral.
            if buyer == seller && !consumed_short.is_zero() {
                self.ledger
                    .credit_cash(&seller, price.notional(consumed_short))?;
            }

            let trade = Trade {
                trade_id: TradeId::new(self.next_trade_id.fetch_add(1, Ordering::SeqCst)),
                symbol_id,
                price,
                quantity: qty,
                buy_order_id,
                sell_order_id,
                buyer_id: Some(buyer),
                seller_id: Some(seller),
                taker_side,
                executed_at: now_nanos(),
            };
            m.trades.push(trade);

            applied.push(FillSummary { price, quantity: qty });
        }

        if let Some(last) = applied.last() {
            m.symbol.record_trade_price(last.price);
        }

        Ok(applied)
    }

    // ── Cancellation ────────────────────────────────────────────────

    /// Cancel a resting order, releasing exactly its reservation
    ///
    /// Idempotent from the caller's view: a repeat cancel, a foreign order
    /// or an unknown id all yield UNKNOWN_ORDER.
    pub fn cancel(&self, user_id: UserId, order_id: OrderId) -> Result<(), ExchangeError> {
        let symbol_id = self
            .order_index
            .get(&order_id)
            .map(|entry| *entry)
            .ok_or(ExchangeError::UnknownOrder)?;
        let market = self
            .registry
            .market(&symbol_id)
            .ok_or(ExchangeError::UnknownOrder)?;
        let mut m = market
            .lock()
            .map_err(|_| ExchangeError::Internal("market lock poisoned".into()))?;

        let order = m.orders.get_mut(&order_id).ok_or(ExchangeError::UnknownOrder)?;
        if !order.is_open() || order.user_id != user_id {
            return Err(ExchangeError::UnknownOrder);
        }

        let refund = match order.side {
            Side::Buy => order.limit_price.notional(order.remaining),
            Side::Sell => order.limit_price.notional(order.remaining_short()),
        };
        let (side, price) = (order.side, order.limit_price);

        self.ledger.credit_cash(&user_id, refund)?;
        order.cancel();
        m.book.remove(&order_id, side, price);

        info!(
            order_id = order_id.as_u64(),
            symbol = %m.symbol.ticker,
            %refund,
            "order cancelled"
        );
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Aggregated book view for one symbol
    pub fn book_snapshot(&self, ticker: &str) -> Result<BookSnapshot, ExchangeError> {
        let market = self
            .registry
            .market_by_ticker(ticker)
            .ok_or(ExchangeError::UnknownSymbol)?;
        let m = market
            .lock()
            .map_err(|_| ExchangeError::Internal("market lock poisoned".into()))?;

        Ok(BookSnapshot {
            symbol: m.symbol.ticker.clone(),
            last_price: m.symbol.last_price,
            direction: m.symbol.price_direction(),
            buy_orders: m.book.bid_depth(),
            sell_orders: m.book.ask_depth(),
        })
    }

    /// Most recent executions for one symbol, newest first
    pub fn recent_trades(&self, ticker: &str, limit: usize) -> Result<Vec<Trade>, ExchangeError> {
        let market = self
            .registry
            .market_by_ticker(ticker)
            .ok_or(ExchangeError::UnknownSymbol)?;
        let m = market
            .lock()
            .map_err(|_| ExchangeError::Internal("market lock poisoned".into()))?;

        Ok(m.trades.iter().rev().take(limit).cloned().collect())
    }

    /// Account summary with holdings resolved to tickers
    pub fn profile(&self, user_id: &UserId) -> Result<UserProfile, ExchangeError> {
        let user = self.ledger.get_user(user_id)?;

        let mut positions: Vec<PositionView> = self
            .ledger
            .positions_for_user(user_id)
            .into_iter()
            .map(|(symbol_id, quantity)| {
                let ticker = self
                    .registry
                    .market(&symbol_id)
                    .and_then(|market| market.lock().ok().map(|m| m.symbol.ticker.clone()))
                    .unwrap_or_default();
                PositionView {
                    symbol_id,
                    ticker,
                    quantity,
                }
            })
            .collect();
        positions.sort_by_key(|view| view.symbol_id);

        Ok(UserProfile { user, positions })
    }

    /// Look up a limit order by id
    pub fn order(&self, order_id: &OrderId) -> Option<Order> {
        let symbol_id = self.order_index.get(order_id).map(|entry| *entry)?;
        let market = self.registry.market(&symbol_id)?;
        let m = market.lock().ok()?;
        m.orders.get(order_id).cloned()
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock timestamp in Unix nanoseconds
pub(crate) fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as i64)
        .unwrap_or_default()
}
