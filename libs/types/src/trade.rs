//! Trade execution records
//!
//! A trade is an immutable, append-only record of one fill. Order ids are
//! absent on the side taken by a market order (market orders are never
//! persisted); user ids become absent when the account is later deleted.

use crate::ids::{OrderId, SymbolId, TradeId, UserId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// One execution between a resting maker and an incoming taker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub symbol_id: SymbolId,
    pub price: Price,
    pub quantity: Quantity,

    pub buy_order_id: Option<OrderId>,
    pub sell_order_id: Option<OrderId>,
    pub buyer_id: Option<UserId>,
    pub seller_id: Option<UserId>,

    /// Which side the incoming order was on
    pub taker_side: Side,
    pub executed_at: i64, // Unix nanos
}

impl Trade {
    /// Cash value of the execution (price x quantity)
    pub fn trade_value(&self) -> rust_decimal::Decimal {
        self.price.notional(self.quantity)
    }

    /// True when both legs belong to the same user
    pub fn is_self_trade(&self) -> bool {
        match (self.buyer_id, self.seller_id) {
            (Some(b), Some(s)) => b == s,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample_trade(buyer: Option<UserId>, seller: Option<UserId>) -> Trade {
        Trade {
            trade_id: TradeId::new(1),
            symbol_id: SymbolId::new(1),
            price: Price::from_u64(100),
            quantity: Quantity::new(4),
            buy_order_id: None,
            sell_order_id: Some(OrderId::new(9)),
            buyer_id: buyer,
            seller_id: seller,
            taker_side: Side::Buy,
            executed_at: 1_708_123_456_789_000_000,
        }
    }

    #[test]
    fn test_trade_value() {
        let trade = sample_trade(Some(UserId::new()), Some(UserId::new()));
        assert_eq!(trade.trade_value(), Decimal::from(400));
    }

    #[test]
    fn test_self_trade_detection() {
        let user = UserId::new();
        assert!(sample_trade(Some(user), Some(user)).is_self_trade());
        assert!(!sample_trade(Some(user), Some(UserId::new())).is_self_trade());
        assert!(!sample_trade(None, Some(user)).is_self_trade());
    }
}
