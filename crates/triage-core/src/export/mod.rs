//! Report export for display and hand-off.

mod report;

pub use report::*;
