//! Price level with FIFO queue
//!
//! A price level contains all resting orders at one price. The queue is
//! strictly FIFO: order ids are monotonic and allocated in submission order,
//! so front-to-back iteration is ascending-id time priority.

use std::collections::VecDeque;
use types::ids::{OrderId, UserId};
use types::numeric::Quantity;

/// Entry in the price level queue
#[derive(Debug, Clone, Copy)]
pub struct LevelEntry {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub remaining: Quantity,
}

/// Resting orders at a single price, in time priority
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    orders: VecDeque<LevelEntry>,
    total_quantity: u64,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the back of the queue (lowest time priority)
    pub fn insert(&mut self, order_id: OrderId, user_id: UserId, quantity: Quantity) {
        self.orders.push_back(LevelEntry {
            order_id,
            user_id,
            remaining: quantity,
        });
        self.total_quantity += quantity.as_u64();
    }

    /// Remove an order by id, returning its remaining quantity
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Quantity> {
        let position = self.orders.iter().position(|entry| &entry.order_id == order_id)?;
        let entry = self.orders.remove(position)?;
        self.total_quantity -= entry.remaining.as_u64();
        Some(entry.remaining)
    }

    /// Decrease an order's remaining quantity after a fill
    ///
    /// The entry is dropped from the queue when its remainder reaches zero.
    /// Returns false if the order is not at this level.
    pub fn decrement(&mut self, order_id: &OrderId, qty: Quantity) -> bool {
        let Some(position) = self.orders.iter().position(|entry| &entry.order_id == order_id) else {
            return false;
        };
        let entry = &mut self.orders[position];
        entry.remaining = entry.remaining - qty;
        self.total_quantity -= qty.as_u64();
        if entry.remaining.is_zero() {
            self.orders.remove(position);
        }
        true
    }

    /// Iterate entries front to back (time priority)
    pub fn iter(&self) -> impl Iterator<Item = &LevelEntry> {
        self.orders.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_quantity(&self) -> Quantity {
        Quantity::new(self.total_quantity)
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_totals() {
        let mut level = PriceLevel::new();
        level.insert(OrderId::new(1), UserId::new(), Quantity::new(5));
        level.insert(OrderId::new(2), UserId::new(), Quantity::new(3));

        assert_eq!(level.order_count(), 2);
        assert_eq!(level.total_quantity(), Quantity::new(8));
    }

    #[test]
    fn test_fifo_iteration() {
        let mut level = PriceLevel::new();
        let user = UserId::new();
        level.insert(OrderId::new(1), user, Quantity::new(1));
        level.insert(OrderId::new(2), user, Quantity::new(2));
        level.insert(OrderId::new(3), user, Quantity::new(3));

        let ids: Vec<u64> = level.iter().map(|e| e.order_id.as_u64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut level = PriceLevel::new();
        let user = UserId::new();
        level.insert(OrderId::new(1), user, Quantity::new(5));
        level.insert(OrderId::new(2), user, Quantity::new(3));

        let removed = level.remove(&OrderId::new(1));
        assert_eq!(removed, Some(Quantity::new(5)));
        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), Quantity::new(3));

        assert!(level.remove(&OrderId::new(99)).is_none());
    }

    #[test]
    fn test_decrement_drops_exhausted_entry() {
        let mut level = PriceLevel::new();
        let user = UserId::new();
        level.insert(OrderId::new(1), user, Quantity::new(5));

        assert!(level.decrement(&OrderId::new(1), Quantity::new(2)));
        assert_eq!(level.total_quantity(), Quantity::new(3));
        assert_eq!(level.order_count(), 1);

        assert!(level.decrement(&OrderId::new(1), Quantity::new(3)));
        assert!(level.is_empty());
        assert_eq!(level.total_quantity(), Quantity::zero());
    }
}
