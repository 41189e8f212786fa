//! Attendance history stack.

use serde::Serialize;

use crate::error::{TriageError, TriageResult};
use crate::models::{Patient, PatientId, PatientStatus};

/// One attendance on the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub patient_id: PatientId,
    /// When the patient was attended (RFC 3339)
    pub attended_at: String,
}

/// LIFO record of attended patients, enabling undo.
#[derive(Debug, Default, Clone)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an attended patient. The status must already be `Attended`.
    pub fn push(&mut self, patient: &Patient) -> TriageResult<()> {
        if patient.status() != PatientStatus::Attended {
            return Err(TriageError::InvalidState(format!(
                "cannot record patient {} with status {} as attended",
                patient.id(),
                patient.status().as_str()
            )));
        }
        self.entries.push(HistoryEntry {
            patient_id: patient.id(),
            attended_at: chrono::Utc::now().to_rfc3339(),
        });
        Ok(())
    }

    pub fn pop(&mut self) -> TriageResult<HistoryEntry> {
        self.entries.pop().ok_or(TriageError::EmptyStack)
    }

    pub fn peek(&self) -> TriageResult<&HistoryEntry> {
        self.entries.last().ok_or(TriageError::EmptyStack)
    }

    /// Up to `limit` entries, most recent first. `None` returns all.
    pub fn snapshot_recent_first(&self, limit: Option<usize>) -> Vec<&HistoryEntry> {
        let limit = limit.unwrap_or(self.entries.len());
        self.entries.iter().rev().take(limit).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
