//! Manager-gated operations
//!
//! Symbol lifecycle and float control (mint/burn), plus account lifecycle.
//! Mint and burn run inside the symbol's critical section so the float and
//! the manager's position move together.

use rust_decimal::Decimal;
use tracing::info;

use types::errors::ExchangeError;
use types::ids::{SymbolId, UserId};
use types::numeric::Quantity;
use types::symbol::MINT_CAP;
use types::user::{Role, User};

use crate::coordinator::Exchange;

/// Starting balance of a fresh account, in cents
const STARTING_CASH_CENTS: i64 = 1_000_000;

impl Exchange {
    /// Balance granted to every new account
    pub fn starting_cash() -> Decimal {
        Decimal::new(STARTING_CASH_CENTS, 2)
    }

    fn require_manager(&self, caller: &UserId) -> Result<User, ExchangeError> {
        let user = self.ledger.get_user(caller)?;
        if !user.role.is_manager() {
            return Err(ExchangeError::PermissionDenied);
        }
        Ok(user)
    }

    // ── Accounts ────────────────────────────────────────────────────

    /// Create an account with the fixed starting balance
    pub fn register_user(&self, username: &str, role: Role) -> Result<User, ExchangeError> {
        if username.is_empty() {
            return Err(ExchangeError::invalid("username must not be empty"));
        }
        if self.ledger.username_taken(username) {
            return Err(ExchangeError::invalid("username already taken"));
        }

        let user = User::new(username, role, Self::starting_cash(), crate::coordinator::now_nanos());
        self.ledger.insert_user(user.clone());

        info!(username, ?role, "user registered");
        Ok(user)
    }

    /// Delete an account
    ///
    /// Refused for the sole remaining manager. Open orders are cancelled
    /// (releasing their reservations), position rows are removed, and the
    /// user's ids on historical trades are nulled out.
    pub fn delete_user(&self, user_id: &UserId) -> Result<(), ExchangeError> {
        let user = self.ledger.get_user(user_id)?;
        if user.role.is_manager() && self.ledger.manager_count() <= 1 {
            return Err(ExchangeError::LastManager);
        }

        for market in self.registry.all_markets() {
            // Collect ids under the lock, cancel through the normal path so
            // refunds and book removal stay in one place.
            let open_orders: Vec<_> = {
                let m = market
                    .lock()
                    .map_err(|_| ExchangeError::Internal("market lock poisoned".into()))?;
                m.orders
                    .values()
                    .filter(|order| order.is_open() && order.user_id == *user_id)
                    .map(|order| order.order_id)
                    .collect()
            };
            for order_id in open_orders {
                // A parallel cancel may have won the race; that is fine.
                match self.cancel(*user_id, order_id) {
                    Ok(()) | Err(ExchangeError::UnknownOrder) => {}
                    Err(other) => return Err(other),
                }
            }

            let mut m = market
                .lock()
                .map_err(|_| ExchangeError::Internal("market lock poisoned".into()))?;
            for trade in m.trades.iter_mut() {
                if trade.buyer_id == Some(*user_id) {
                    trade.buyer_id = None;
                }
                if trade.seller_id == Some(*user_id) {
                    trade.seller_id = None;
                }
            }
        }

        self.ledger.remove_positions_for_user(user_id);
        self.ledger.remove_user(user_id);

        info!(username = %user.username, "user deleted");
        Ok(())
    }

    // ── Symbols ─────────────────────────────────────────────────────

    /// Register a new tradable symbol with zero outstanding shares
    pub fn create_symbol(&self, caller: &UserId, ticker: &str) -> Result<SymbolId, ExchangeError> {
        self.require_manager(caller)?;
        let symbol_id = self.registry.create(ticker)?;
        info!(ticker, %symbol_id, "symbol created");
        Ok(symbol_id)
    }

    /// Remove a symbol that nothing references
    pub fn delete_symbol(&self, caller: &UserId, symbol_id: &SymbolId) -> Result<(), ExchangeError> {
        self.require_manager(caller)?;
        self.registry.remove_if(symbol_id, |m| {
            if !m.book.is_empty() || self.ledger.symbol_in_use(symbol_id) {
                return Err(ExchangeError::SymbolInUse);
            }
            Ok(())
        })?;
        info!(%symbol_id, "symbol deleted");
        Ok(())
    }

    /// Create shares: add to the float and credit the manager's position
    pub fn mint(&self, caller: &UserId, symbol_id: &SymbolId, quantity: u64) -> Result<(), ExchangeError> {
        self.require_manager(caller)?;
        if quantity == 0 {
            return Err(ExchangeError::invalid("quantity must be at least 1"));
        }
        if quantity > MINT_CAP {
            return Err(ExchangeError::invalid("mint quantity exceeds the per-call cap"));
        }

        let market = self
            .registry
            .market(symbol_id)
            .ok_or(ExchangeError::UnknownSymbol)?;
        let mut m = market
            .lock()
            .map_err(|_| ExchangeError::Internal("market lock poisoned".into()))?;

        m.symbol.outstanding = m.symbol.outstanding + Quantity::new(quantity);
        self.ledger.adjust_position(*caller, *symbol_id, quantity as i64);

        info!(symbol = %m.symbol.ticker, quantity, "shares minted");
        Ok(())
    }

    /// Destroy shares from the manager's own position
    pub fn burn(&self, caller: &UserId, symbol_id: &SymbolId, quantity: u64) -> Result<(), ExchangeError> {
        self.require_manager(caller)?;
        if quantity == 0 {
            return Err(ExchangeError::invalid("quantity must be at least 1"));
        }

        let market = self
            .registry
            .market(symbol_id)
            .ok_or(ExchangeError::UnknownSymbol)?;
        let mut m = market
            .lock()
            .map_err(|_| ExchangeError::Internal("market lock poisoned".into()))?;

        if self.ledger.position(caller, symbol_id) < quantity as i64 {
            return Err(ExchangeError::invalid("cannot burn more shares than held"));
        }
        if m.symbol.outstanding.as_u64() < quantity {
            return Err(ExchangeError::InsufficientSharesInCirculation);
        }

        m.symbol.outstanding = m.symbol.outstanding - Quantity::new(quantity);
        self.ledger.adjust_position(*caller, *symbol_id, -(quantity as i64));

        info!(symbol = %m.symbol.ticker, quantity, "shares burned");
        Ok(())
    }
}
