//! Price and quantity newtypes
//!
//! Prices use rust_decimal for deterministic arithmetic (no floating-point
//! errors) and carry at most two fractional digits, matching the cash scale.
//! Quantities are whole share counts. Prices serialize as strings to prevent
//! JSON number precision loss.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Maximum fractional digits for a price (matches the cash scale)
pub const PRICE_SCALE: u32 = 2;

/// Price with fixed-point decimal representation
///
/// Must be positive and carry at most two fractional digits. Serialized as a
/// string to prevent JSON number precision loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Create a new Price from a Decimal
    ///
    /// # Panics
    /// Panics if the price is not positive or exceeds the two-decimal scale
    pub fn new(value: Decimal) -> Self {
        Self::try_new(value).expect("Price must be positive with at most 2 decimal places")
    }

    /// Try to create a Price, returning None if invalid
    ///
    /// Trailing zeros do not count against the scale limit, so "100.250"
    /// is accepted and compares equal to "100.25".
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO && value.normalize().scale() <= PRICE_SCALE {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create from integer (for testing/convenience)
    pub fn from_u64(value: u64) -> Self {
        Self::new(Decimal::from(value))
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Cash value of `qty` shares at this price
    pub fn notional(&self, qty: Quantity) -> Decimal {
        self.0 * Decimal::from(qty.as_u64())
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s)?;
        Ok(Self::new(decimal))
    }
}

// Custom serialization to preserve precision
impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(&s).map_err(serde::de::Error::custom)?;
        Self::try_new(decimal)
            .ok_or_else(|| serde::de::Error::custom("price must be positive with at most 2 decimal places"))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whole-share quantity
///
/// Remaining quantities may reach zero through fills; submitted quantities
/// must be at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// The smaller of two quantities
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(self.0 >= rhs.0, "Quantity subtraction would underflow");
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_creation() {
        let price = Price::from_u64(100);
        assert_eq!(price.as_decimal(), Decimal::from(100));
    }

    #[test]
    #[should_panic(expected = "Price must be positive")]
    fn test_price_negative_panics() {
        Price::new(Decimal::from(-100));
    }

    #[test]
    fn test_price_rejects_excess_scale() {
        let fine: Option<Price> = Price::try_new(Decimal::from_str("100.25").unwrap());
        assert!(fine.is_some());

        let too_fine = Price::try_new(Decimal::from_str("100.255").unwrap());
        assert!(too_fine.is_none());
    }

    #[test]
    fn test_price_trailing_zeros_accepted() {
        // 100.250 has scale 3 but is numerically a two-decimal price
        let price = Price::try_new(Decimal::from_str("100.250").unwrap()).unwrap();
        assert_eq!(price, "100.25".parse().unwrap());
    }

    #[test]
    fn test_price_notional() {
        let price: Price = "100.25".parse().unwrap();
        let cash = price.notional(Quantity::new(4));
        assert_eq!(cash, Decimal::from_str("401.00").unwrap());
    }

    #[test]
    fn test_price_serialization() {
        let price: Price = "99.50".parse().unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"99.50\"");

        let deserialized: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, deserialized);
    }

    #[test]
    fn test_quantity_arithmetic() {
        let q1 = Quantity::new(10);
        let q2 = Quantity::new(4);

        assert_eq!(q1 + q2, Quantity::new(14));
        assert_eq!(q1 - q2, Quantity::new(6));
        assert_eq!(q1.min(q2), q2);
    }

    #[test]
    #[should_panic(expected = "underflow")]
    fn test_quantity_underflow_panics() {
        let _ = Quantity::new(1) - Quantity::new(2);
    }

    #[test]
    fn test_quantity_zero() {
        assert!(Quantity::zero().is_zero());
        assert!(!Quantity::new(1).is_zero());
    }
}
