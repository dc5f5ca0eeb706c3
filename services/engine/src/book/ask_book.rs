//! Ask (sell-side) order book
//!
//! Sell orders sorted by price ascending (best ask first). Mirrors the bid
//! book with the opposite price ordering.

use std::collections::BTreeMap;
use types::ids::{OrderId, UserId};
use types::numeric::{Price, Quantity};

use super::price_level::{LevelEntry, PriceLevel};

/// Ask side of the book
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    /// Price levels; BTreeMap iterates ascending, so the best ask is first
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, order_id: OrderId, user_id: UserId, price: Price, qty: Quantity) {
        self.levels
            .entry(price)
            .or_default()
            .insert(order_id, user_id, qty);
    }

    /// Remove an order; empty levels are dropped to keep the book clean
    pub fn remove(&mut self, order_id: &OrderId, price: Price) -> bool {
        if let Some(level) = self.levels.get_mut(&price) {
            if level.remove(order_id).is_some() {
                if level.is_empty() {
                    self.levels.remove(&price);
                }
                return true;
            }
        }
        false
    }

    /// Decrease an order's remaining quantity after a fill
    pub fn decrement(&mut self, order_id: &OrderId, price: Price, qty: Quantity) -> bool {
        if let Some(level) = self.levels.get_mut(&price) {
            if level.decrement(order_id, qty) {
                if level.is_empty() {
                    self.levels.remove(&price);
                }
                return true;
            }
        }
        false
    }

    /// Lowest resting sell price
    pub fn best_ask(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Resting sells that a buy bounded at `limit` could cross, in priority
    /// order: ascending price, then ascending id. No bound yields the whole
    /// side.
    pub fn candidates(&self, limit: Option<Price>) -> impl Iterator<Item = (Price, &LevelEntry)> {
        let range = match limit {
            Some(bound) => self.levels.range(..=bound),
            None => self.levels.range(..),
        };
        range.flat_map(|(price, level)| level.iter().map(move |entry| (*price, entry)))
    }

    /// Aggregated per-level depth, best (lowest) price first
    pub fn depth(&self) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.levels.values().map(|level| level.order_count()).sum()
    }
}
