//! Patient models.

use serde::Serialize;

use super::UrgencyLevel;
use crate::error::{TriageError, TriageResult};

/// Engine-assigned patient identifier. Never reused.
pub type PatientId = u64;

/// Where a patient currently sits in the triage flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientStatus {
    /// In the waiting queue
    Waiting,
    /// On the attendance history stack
    Attended,
}

impl PatientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PatientStatus::Waiting => "WAITING",
            PatientStatus::Attended => "ATTENDED",
        }
    }
}

/// A registered patient.
///
/// Everything except `status` is fixed at creation. Status only moves
/// between `Waiting` and `Attended` through [`Patient::transition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    id: PatientId,
    name: String,
    urgency: UrgencyLevel,
    /// Tie-break counter, assigned once at registration
    arrival_sequence: u64,
    status: PatientStatus,
    /// Registration timestamp (RFC 3339)
    registered_at: String,
}

impl Patient {
    /// Create a waiting patient.
    ///
    /// The name is trimmed; a blank name or a level outside 1..=5 is
    /// rejected with `InvalidInput`.
    pub fn new(
        id: PatientId,
        arrival_sequence: u64,
        name: &str,
        urgency_level: u8,
    ) -> TriageResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TriageError::InvalidInput(
                "patient name cannot be empty".into(),
            ));
        }
        let urgency = UrgencyLevel::try_from(urgency_level)?;

        Ok(Self {
            id,
            name: name.to_string(),
            urgency,
            arrival_sequence,
            status: PatientStatus::Waiting,
            registered_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    pub fn id(&self) -> PatientId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn urgency(&self) -> UrgencyLevel {
        self.urgency
    }

    pub fn arrival_sequence(&self) -> u64 {
        self.arrival_sequence
    }

    pub fn status(&self) -> PatientStatus {
        self.status
    }

    pub fn registered_at(&self) -> &str {
        &self.registered_at
    }

    pub fn is_waiting(&self) -> bool {
        self.status == PatientStatus::Waiting
    }

    /// Move to the other status. Only `Waiting -> Attended` and
    /// `Attended -> Waiting` are legal.
    pub(crate) fn transition(&mut self, to: PatientStatus) -> TriageResult<()> {
        if self.status == to {
            return Err(TriageError::InvalidState(format!(
                "patient {} is already {}",
                self.id,
                to.as_str()
            )));
        }
        self.status = to;
        Ok(())
    }
}
