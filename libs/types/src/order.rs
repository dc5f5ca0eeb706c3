//! Order lifecycle types
//!
//! Limit orders rest in the book and move OPEN -> FILLED or OPEN ->
//! CANCELLED. Market orders never rest: their whole lifetime is a single
//! submission, so no order record is kept for them.

use crate::ids::{OrderId, SymbolId, UserId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Rests in the book at a limit price
    Limit,
    /// Executes immediately against resting orders, never rests
    Market,
}

/// Resting order status
///
/// FILLED and CANCELLED are terminal: the order's remaining quantity is zero
/// and it is never matched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    Filled,
    Cancelled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

/// A resting limit order
///
/// `short_reserved` is the short overhang at submission time: the portion of
/// the quantity not covered by the seller's position, for which collateral
/// was debited at the limit price. Zero for buys and fully covered sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub symbol_id: SymbolId,
    pub side: Side,
    pub limit_price: Price,
    pub quantity: Quantity,
    pub remaining: Quantity,
    pub short_reserved: Quantity,
    pub status: OrderStatus,
    pub created_at: i64, // Unix nanos
}

impl Order {
    /// Create a new open limit order at its full quantity
    pub fn new_limit(
        order_id: OrderId,
        user_id: UserId,
        symbol_id: SymbolId,
        side: Side,
        limit_price: Price,
        quantity: Quantity,
        short_reserved: Quantity,
        created_at: i64,
    ) -> Self {
        Self {
            order_id,
            user_id,
            symbol_id,
            side,
            limit_price,
            quantity,
            remaining: quantity,
            short_reserved,
            status: OrderStatus::Open,
            created_at,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, OrderStatus::Open)
    }

    /// The short portion still backed by collateral
    ///
    /// Fills consume the covered portion first, so the live collateral
    /// quantity is min(short_reserved, remaining).
    pub fn remaining_short(&self) -> Quantity {
        self.short_reserved.min(self.remaining)
    }

    /// Apply a fill, decrementing the remaining quantity
    ///
    /// Marks the order FILLED when remaining reaches zero.
    ///
    /// # Panics
    /// Panics if the order is not open or the fill exceeds the remainder
    pub fn fill(&mut self, qty: Quantity) {
        assert!(self.is_open(), "cannot fill a closed order");
        self.remaining = self.remaining - qty;
        if self.remaining.is_zero() {
            self.status = OrderStatus::Filled;
        }
    }

    /// Cancel the order, zeroing the remainder
    ///
    /// # Panics
    /// Panics if the order is already terminal
    pub fn cancel(&mut self) {
        assert!(self.is_open(), "cannot cancel a closed order");
        self.remaining = Quantity::zero();
        self.status = OrderStatus::Cancelled;
    }
}
