//! Error taxonomy
//!
//! Every rejection the engine can produce, with its canonical user-facing
//! message. A rejection never leaves partial state behind: validation and
//! reservation errors abort before any mutation, and matching-phase failures
//! unwind the whole submission.

use thiserror::Error;

/// Rejection reasons surfaced by the exchange
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown symbol")]
    UnknownSymbol,

    #[error("order not found or already closed")]
    UnknownOrder,

    #[error("unknown user")]
    UnknownUser,

    #[error("limit order would cross the book; submit a market order instead")]
    CrossesBook,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("not enough shares in circulation")]
    InsufficientSharesInCirculation,

    #[error("no matching orders available")]
    NoLiquidity,

    #[error("symbol has open orders or positions")]
    SymbolInUse,

    #[error("cannot delete the last manager")]
    LastManager,

    #[error("permission denied")]
    PermissionDenied,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ExchangeError {
    /// Convenience constructor for input validation failures
    pub fn invalid(msg: impl Into<String>) -> Self {
        ExchangeError::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ExchangeError::CrossesBook.to_string(),
            "limit order would cross the book; submit a market order instead"
        );
        assert_eq!(ExchangeError::UnknownOrder.to_string(), "order not found or already closed");
        assert_eq!(
            ExchangeError::invalid("quantity must be at least 1").to_string(),
            "invalid input: quantity must be at least 1"
        );
    }
}
