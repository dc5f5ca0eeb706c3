//! Order matching and settlement engine
//!
//! The engine maintains, per symbol, a two-sided price-time-priority book,
//! and globally a cash/position ledger. Submissions and cancellations are
//! serialized per symbol; the ledger is touched only inside that critical
//! section, so cash, positions and the book evolve together.
//!
//! # Modules
//! - `ledger`: authoritative cash and position state
//! - `registry`: symbol registry and per-symbol market state
//! - `book`: two-sided resting-order book
//! - `matching`: crossing predicates and the pure match reduction
//! - `coordinator`: the `Exchange` facade (submit, cancel, queries)
//! - `admin`: manager-gated float and account lifecycle operations

pub mod admin;
pub mod book;
pub mod coordinator;
pub mod ledger;
pub mod matching;
pub mod registry;

pub use coordinator::{Exchange, FillSummary, SubmitOutcome, SubmitRequest, SubmitStatus, RECENT_TRADES};
