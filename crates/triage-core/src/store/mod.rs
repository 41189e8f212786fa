//! In-memory stores backing the triage engine.
//!
//! The [`Registry`] owns every [`crate::models::Patient`]. The
//! [`WaitingQueue`] and [`HistoryStack`] hold only identifiers, so a
//! patient's status is always read from a single place.

mod history;
mod registry;
mod waiting;

pub use history::*;
pub use registry::*;
pub use waiting::*;
