//! Crossing detection and the pure match reduction

pub mod crossing;
pub mod matcher;

pub use matcher::{match_incoming, MatchPlan, ProposedFill};
