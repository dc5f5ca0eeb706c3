//! Authoritative cash and position state
//!
//! Balances live in concurrent maps so reads from other symbols' critical
//! sections never block, while each individual mutation is atomic: the
//! conditional debit in `reserve_cash` verifies and deducts under the same
//! entry lock, so a balance can never be driven below zero.
//!
//! Position rows hold signed share counts; a negative quantity is a short.
//! A row that reaches zero is removed, so "row exists" means "non-zero
//! position".

use dashmap::DashMap;
use rust_decimal::Decimal;
use types::errors::ExchangeError;
use types::ids::{SymbolId, UserId};
use types::user::{Role, User};

/// Cash balances and signed per-symbol positions
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: DashMap<UserId, User>,
    positions: DashMap<(UserId, SymbolId), i64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accounts ────────────────────────────────────────────────────

    pub fn insert_user(&self, user: User) {
        self.accounts.insert(user.user_id, user);
    }

    pub fn remove_user(&self, user_id: &UserId) -> Option<User> {
        self.accounts.remove(user_id).map(|(_, user)| user)
    }

    pub fn get_user(&self, user_id: &UserId) -> Result<User, ExchangeError> {
        self.accounts
            .get(user_id)
            .map(|entry| entry.clone())
            .ok_or(ExchangeError::UnknownUser)
    }

    pub fn contains_user(&self, user_id: &UserId) -> bool {
        self.accounts.contains_key(user_id)
    }

    pub fn username_taken(&self, username: &str) -> bool {
        self.accounts.iter().any(|entry| entry.username == username)
    }

    pub fn manager_count(&self) -> usize {
        self.accounts.iter().filter(|entry| entry.role == Role::Manager).count()
    }

    // ── Cash ────────────────────────────────────────────────────────

    /// Atomically verify the balance covers `amount` and deduct it
    pub fn reserve_cash(&self, user_id: &UserId, amount: Decimal) -> Result<(), ExchangeError> {
        let mut entry = self.accounts.get_mut(user_id).ok_or(ExchangeError::UnknownUser)?;
        entry.reserve(amount)
    }

    /// Unconditional credit
    pub fn credit_cash(&self, user_id: &UserId, amount: Decimal) -> Result<(), ExchangeError> {
        let mut entry = self.accounts.get_mut(user_id).ok_or(ExchangeError::UnknownUser)?;
        entry.credit(amount);
        Ok(())
    }

    /// Unconditional debit
    pub fn debit_cash(&self, user_id: &UserId, amount: Decimal) -> Result<(), ExchangeError> {
        let mut entry = self.accounts.get_mut(user_id).ok_or(ExchangeError::UnknownUser)?;
        entry.debit(amount);
        Ok(())
    }

    pub fn cash(&self, user_id: &UserId) -> Result<Decimal, ExchangeError> {
        Ok(self.get_user(user_id)?.cash)
    }

    // ── Positions ───────────────────────────────────────────────────

    /// Signed addition to a position; the row is removed when it settles
    /// back to zero
    pub fn adjust_position(&self, user_id: UserId, symbol_id: SymbolId, delta: i64) {
        if delta == 0 {
            return;
        }
        let key = (user_id, symbol_id);
        let mut entry = self.positions.entry(key).or_insert(0);
        *entry += delta;
        let now_zero = *entry == 0;
        drop(entry);
        if now_zero {
            self.positions.remove_if(&key, |_, qty| *qty == 0);
        }
    }

    /// Signed position, defaulting to 0
    pub fn position(&self, user_id: &UserId, symbol_id: &SymbolId) -> i64 {
        self.positions
            .get(&(*user_id, *symbol_id))
            .map(|entry| *entry)
            .unwrap_or(0)
    }

    /// All non-zero positions held by a user
    pub fn positions_for_user(&self, user_id: &UserId) -> Vec<(SymbolId, i64)> {
        self.positions
            .iter()
            .filter(|entry| entry.key().0 == *user_id)
            .map(|entry| (entry.key().1, *entry.value()))
            .collect()
    }

    pub fn remove_positions_for_user(&self, user_id: &UserId) {
        self.positions.retain(|(owner, _), _| owner != user_id);
    }

    /// True when any user holds a non-zero position in the symbol
    pub fn symbol_in_use(&self, symbol_id: &SymbolId) -> bool {
        self.positions.iter().any(|entry| entry.key().1 == *symbol_id)
    }

    /// Sum of all positions for a symbol
    pub fn total_position(&self, symbol_id: &SymbolId) -> i64 {
        self.positions
            .iter()
            .filter(|entry| entry.key().1 == *symbol_id)
            .map(|entry| *entry.value())
            .sum()
    }
}
