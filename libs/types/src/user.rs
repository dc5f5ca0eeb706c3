//! User accounts and roles
//!
//! A user holds a single cash balance with two-decimal scale. Reservations
//! (buy-order cash, short-sale collateral) are plain debits here; the engine
//! releases or consumes them, so the balance at rest is never negative.

use crate::errors::ExchangeError;
use crate::ids::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Manager,
}

impl Role {
    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager)
    }
}

/// User account with cash balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    pub cash: Decimal,
    pub created_at: i64, // Unix nanos
}

impl User {
    /// Create a new account with a starting balance
    pub fn new(username: impl Into<String>, role: Role, starting_cash: Decimal, timestamp: i64) -> Self {
        Self {
            user_id: UserId::new(),
            username: username.into(),
            role,
            cash: starting_cash,
            created_at: timestamp,
        }
    }

    /// Conditionally debit: verify the balance covers `amount` and deduct
    pub fn reserve(&mut self, amount: Decimal) -> Result<(), ExchangeError> {
        debug_assert!(amount >= Decimal::ZERO);
        if self.cash < amount {
            return Err(ExchangeError::InsufficientFunds);
        }
        self.cash -= amount;
        Ok(())
    }

    /// Unconditional credit
    pub fn credit(&mut self, amount: Decimal) {
        debug_assert!(amount >= Decimal::ZERO);
        self.cash += amount;
    }

    /// Unconditional debit
    pub fn debit(&mut self, amount: Decimal) {
        debug_assert!(amount >= Decimal::ZERO);
        self.cash -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new("alice", Role::User, Decimal::from(10_000), 1_708_123_456_789_000_000)
    }

    #[test]
    fn test_user_creation() {
        let user = sample_user();
        assert_eq!(user.cash, Decimal::from(10_000));
        assert!(!user.role.is_manager());
    }

    #[test]
    fn test_reserve_success() {
        let mut user = sample_user();
        user.reserve(Decimal::from(3_000)).unwrap();
        assert_eq!(user.cash, Decimal::from(7_000));
    }

    #[test]
    fn test_reserve_insufficient() {
        let mut user = sample_user();
        let err = user.reserve(Decimal::from(15_000)).unwrap_err();
        assert_eq!(err, ExchangeError::InsufficientFunds);
        assert_eq!(user.cash, Decimal::from(10_000), "failed reserve must not change the balance");
    }

    #[test]
    fn test_credit_and_debit() {
        let mut user = sample_user();
        user.credit(Decimal::from(500));
        user.debit(Decimal::from(200));
        assert_eq!(user.cash, Decimal::from(10_300));
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"manager\"");
    }
}
