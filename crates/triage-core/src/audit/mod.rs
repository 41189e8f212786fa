//! Hash-chained journal of triage events for tamper-evident review.

mod chain;

pub use chain::*;
