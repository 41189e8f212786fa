//! Domain models for the triage system.

mod patient;
mod stats;
mod urgency;

pub use patient::*;
pub use stats::*;
pub use urgency::*;
