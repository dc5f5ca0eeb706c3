//! Crossing detection
//!
//! Price-compatibility predicate used by cross-prevention; the book's
//! candidate iteration applies the same bound when matching.

use types::numeric::Price;
use types::order::Side;

/// Check if an incoming order at `incoming_price` crosses a resting order
/// at `resting_price`
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::Buy => incoming_price >= resting_price,
        Side::Sell => incoming_price <= resting_price,
    }
}
