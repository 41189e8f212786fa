//! Engine error kinds.

use thiserror::Error;

/// Errors raised by the triage stores and engine.
///
/// `EmptyQueue` and `EmptyStack` are expected, recoverable conditions.
/// `InvalidState` signals a broken internal contract and should never be
/// reachable through [`crate::TriageEngine`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriageError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("No patients in the waiting queue")]
    EmptyQueue,

    #[error("No attended patients to undo")]
    EmptyStack,
}

impl TriageError {
    /// True when the error indicates a programming defect rather than a
    /// caller mistake or an empty structure.
    pub fn is_defect(&self) -> bool {
        matches!(self, TriageError::InvalidState(_))
    }
}

pub type TriageResult<T> = Result<T, TriageError>;
