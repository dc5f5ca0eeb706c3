//! Symbol registry and per-symbol market state
//!
//! Each symbol owns a `Market`: the symbol record, its book, the flat store
//! of limit orders and the append-only trade log. A market is guarded by its
//! own mutex, which is the per-symbol critical section; the registry's maps
//! are only ever locked while no market mutex is held, so cross-symbol
//! operations run in parallel without lock-order inversions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use types::errors::ExchangeError;
use types::ids::{OrderId, SymbolId};
use types::order::Order;
use types::symbol::Symbol;
use types::trade::Trade;

use crate::book::OrderBook;

/// Mutable state of one symbol, guarded by the symbol's mutex
#[derive(Debug)]
pub struct Market {
    pub symbol: Symbol,
    pub book: OrderBook,
    /// Flat store of all limit orders for this symbol, open and closed;
    /// the book references them by id
    pub orders: HashMap<OrderId, Order>,
    /// Append-only execution log, oldest first
    pub trades: Vec<Trade>,
}

impl Market {
    fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            book: OrderBook::new(),
            orders: HashMap::new(),
            trades: Vec::new(),
        }
    }
}

/// The set of tradable symbols
#[derive(Debug, Default)]
pub struct Registry {
    markets: RwLock<HashMap<SymbolId, Arc<Mutex<Market>>>>,
    tickers: RwLock<HashMap<String, SymbolId>>,
    next_symbol_id: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            markets: RwLock::new(HashMap::new()),
            tickers: RwLock::new(HashMap::new()),
            next_symbol_id: AtomicU64::new(1),
        }
    }

    /// Register a new symbol with an empty book and no float
    pub fn create(&self, ticker: &str) -> Result<SymbolId, ExchangeError> {
        if ticker.is_empty() {
            return Err(ExchangeError::invalid("ticker must not be empty"));
        }

        let mut tickers = self
            .tickers
            .write()
            .map_err(|_| ExchangeError::Internal("registry lock poisoned".into()))?;
        if tickers.contains_key(ticker) {
            return Err(ExchangeError::invalid("symbol already exists"));
        }

        let symbol_id = SymbolId::new(self.next_symbol_id.fetch_add(1, Ordering::SeqCst));
        let market = Market::new(Symbol::new(symbol_id, ticker));

        let mut markets = self
            .markets
            .write()
            .map_err(|_| ExchangeError::Internal("registry lock poisoned".into()))?;
        markets.insert(symbol_id, Arc::new(Mutex::new(market)));
        tickers.insert(ticker.to_string(), symbol_id);

        Ok(symbol_id)
    }

    /// Look up a market by id
    pub fn market(&self, symbol_id: &SymbolId) -> Option<Arc<Mutex<Market>>> {
        self.markets.read().ok()?.get(symbol_id).cloned()
    }

    /// Look up a market by ticker
    pub fn market_by_ticker(&self, ticker: &str) -> Option<Arc<Mutex<Market>>> {
        let symbol_id = *self.tickers.read().ok()?.get(ticker)?;
        self.market(&symbol_id)
    }

    /// All markets, for operations that sweep every symbol
    pub fn all_markets(&self) -> Vec<Arc<Mutex<Market>>> {
        self.markets
            .read()
            .map(|markets| markets.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove a symbol if `check` allows it
    ///
    /// Takes the registry's write locks first (tickers before markets, the
    /// same order as `create`) and the market mutex second, so no new
    /// reference to the market can be handed out while the check and
    /// removal run.
    pub fn remove_if<F>(&self, symbol_id: &SymbolId, check: F) -> Result<(), ExchangeError>
    where
        F: FnOnce(&Market) -> Result<(), ExchangeError>,
    {
        let mut tickers = self
            .tickers
            .write()
            .map_err(|_| ExchangeError::Internal("registry lock poisoned".into()))?;
        let mut markets = self
            .markets
            .write()
            .map_err(|_| ExchangeError::Internal("registry lock poisoned".into()))?;

        let market = markets.get(symbol_id).ok_or(ExchangeError::UnknownSymbol)?;
        let ticker = {
            let guard = market
                .lock()
                .map_err(|_| ExchangeError::Internal("market lock poisoned".into()))?;
            check(&guard)?;
            guard.symbol.ticker.clone()
        };

        markets.remove(symbol_id);
        tickers.remove(&ticker);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup() {
        let registry = Registry::new();
        let id = registry.create("ACME").unwrap();

        assert!(registry.market(&id).is_some());
        assert!(registry.market_by_ticker("ACME").is_some());
        assert!(registry.market_by_ticker("NOPE").is_none());
    }

    #[test]
    fn test_duplicate_ticker_rejected() {
        let registry = Registry::new();
        registry.create("ACME").unwrap();

        let err = registry.create("ACME").unwrap_err();
        assert_eq!(err, ExchangeError::invalid("symbol already exists"));
    }

    #[test]
    fn test_symbol_ids_are_unique() {
        let registry = Registry::new();
        let a = registry.create("AAA").unwrap();
        let b = registry.create("BBB").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_if_respects_check() {
        let registry = Registry::new();
        let id = registry.create("ACME").unwrap();

        let err = registry
            .remove_if(&id, |_| Err(ExchangeError::SymbolInUse))
            .unwrap_err();
        assert_eq!(err, ExchangeError::SymbolInUse);
        assert!(registry.market(&id).is_some());

        registry.remove_if(&id, |_| Ok(())).unwrap();
        assert!(registry.market(&id).is_none());
        assert!(registry.market_by_ticker("ACME").is_none());
    }

    #[test]
    fn test_remove_unknown_symbol() {
        let registry = Registry::new();
        let err = registry.remove_if(&SymbolId::new(42), |_| Ok(())).unwrap_err();
        assert_eq!(err, ExchangeError::UnknownSymbol);
    }
}
