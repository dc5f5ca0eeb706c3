//! Tradable instruments
//!
//! A symbol tracks its outstanding float (minted minus burned) and the last
//! two trade prices, from which the snapshot's price direction is derived.

use crate::ids::SymbolId;
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Largest number of shares a single mint call may create
pub const MINT_CAP: u64 = 1_000_000;

/// Direction of the most recent price move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceDirection {
    Up,
    Down,
    Same,
}

/// A tradable instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub symbol_id: SymbolId,
    pub ticker: String,
    pub outstanding: Quantity,
    pub last_price: Option<Price>,
    pub previous_price: Option<Price>,
}

impl Symbol {
    /// Register a new symbol with no float and no price history
    pub fn new(symbol_id: SymbolId, ticker: impl Into<String>) -> Self {
        Self {
            symbol_id,
            ticker: ticker.into(),
            outstanding: Quantity::zero(),
            last_price: None,
            previous_price: None,
        }
    }

    /// Record the last executed price of a submission
    ///
    /// The previous price becomes the old last price; on the very first
    /// print it falls back to the new price itself, so the direction reads
    /// as unchanged.
    pub fn record_trade_price(&mut self, price: Price) {
        self.previous_price = Some(self.last_price.unwrap_or(price));
        self.last_price = Some(price);
    }

    /// Direction of the last price move
    pub fn price_direction(&self) -> PriceDirection {
        match (self.last_price, self.previous_price) {
            (Some(last), Some(prev)) if last > prev => PriceDirection::Up,
            (Some(last), Some(prev)) if last < prev => PriceDirection::Down,
            _ => PriceDirection::Same,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_symbol_has_no_history() {
        let symbol = Symbol::new(SymbolId::new(1), "ACME");
        assert!(symbol.last_price.is_none());
        assert!(symbol.outstanding.is_zero());
        assert_eq!(symbol.price_direction(), PriceDirection::Same);
    }

    #[test]
    fn test_first_print_reads_as_same() {
        let mut symbol = Symbol::new(SymbolId::new(1), "ACME");
        symbol.record_trade_price(Price::from_u64(100));

        assert_eq!(symbol.last_price, Some(Price::from_u64(100)));
        assert_eq!(symbol.previous_price, Some(Price::from_u64(100)));
        assert_eq!(symbol.price_direction(), PriceDirection::Same);
    }

    #[test]
    fn test_price_direction_tracks_moves() {
        let mut symbol = Symbol::new(SymbolId::new(1), "ACME");
        symbol.record_trade_price(Price::from_u64(100));

        symbol.record_trade_price(Price::from_u64(105));
        assert_eq!(symbol.price_direction(), PriceDirection::Up);

        symbol.record_trade_price(Price::from_u64(101));
        assert_eq!(symbol.price_direction(), PriceDirection::Down);

        symbol.record_trade_price(Price::from_u64(101));
        assert_eq!(symbol.price_direction(), PriceDirection::Same);
    }
}
