//! Audit chain core implementation.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::{PatientId, UrgencyLevel};

/// Audit chain errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("Previous hash mismatch at entry {0}")]
    BrokenLink(u64),

    #[error("Entry hash mismatch at entry {0}")]
    TamperedEntry(u64),

    #[error("Sequence gap at entry {0}")]
    SequenceGap(u64),
}

pub type AuditResult<T> = Result<T, AuditError>;

/// Hash that precedes the first entry.
pub const GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// A state change committed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditEvent {
    Registered {
        patient_id: PatientId,
        urgency: UrgencyLevel,
    },
    Attended {
        patient_id: PatientId,
    },
    AttendanceUndone {
        patient_id: PatientId,
    },
}

impl AuditEvent {
    pub fn patient_id(&self) -> PatientId {
        match self {
            AuditEvent::Registered { patient_id, .. }
            | AuditEvent::Attended { patient_id }
            | AuditEvent::AttendanceUndone { patient_id } => *patient_id,
        }
    }
}

/// Canonical text form used for hashing.
impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEvent::Registered { patient_id, urgency } => {
                write!(f, "registered:{}:{}", patient_id, urgency.level())
            }
            AuditEvent::Attended { patient_id } => write!(f, "attended:{}", patient_id),
            AuditEvent::AttendanceUndone { patient_id } => {
                write!(f, "attendance_undone:{}", patient_id)
            }
        }
    }
}

/// One link in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    /// Position in the journal, starting at 0
    pub sequence: u64,
    pub event: AuditEvent,
    /// Commit timestamp (RFC 3339)
    pub recorded_at: String,
    pub prev_hash: String,
    pub entry_hash: String,
}

impl AuditEntry {
    fn compute_hash(&self) -> String {
        entry_hash(self.sequence, &self.prev_hash, &self.event, &self.recorded_at)
    }
}

/// Append-only, in-memory event journal.
#[derive(Debug, Default, Clone)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and link it to the current head.
    pub fn record(&mut self, event: AuditEvent) -> &AuditEntry {
        let sequence = self.entries.len() as u64;
        let prev_hash = self.head_hash().to_string();
        let recorded_at = chrono::Utc::now().to_rfc3339();
        let entry_hash = entry_hash(sequence, &prev_hash, &event, &recorded_at);

        self.entries.push(AuditEntry {
            sequence,
            event,
            recorded_at,
            prev_hash,
            entry_hash,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Hash of the newest entry, or [`GENESIS_HASH`] when empty.
    pub fn head_hash(&self) -> &str {
        self.entries
            .last()
            .map(|e| e.entry_hash.as_str())
            .unwrap_or(GENESIS_HASH)
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    /// Entries touching one patient, oldest first.
    pub fn entries_for(&self, patient_id: PatientId) -> Vec<&AuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.event.patient_id() == patient_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recompute the whole chain and report the first bad entry.
    pub fn verify(&self) -> AuditResult<()> {
        verify_entries(&self.entries)
    }
}

/// Verify a detached list of entries (standalone function for external use).
pub fn verify_entries(entries: &[AuditEntry]) -> AuditResult<()> {
    let mut expected_prev = GENESIS_HASH;

    for (i, entry) in entries.iter().enumerate() {
        if entry.sequence != i as u64 {
            return Err(AuditError::SequenceGap(i as u64));
        }
        if entry.prev_hash != expected_prev {
            return Err(AuditError::BrokenLink(entry.sequence));
        }
        if entry.compute_hash() != entry.entry_hash {
            return Err(AuditError::TamperedEntry(entry.sequence));
        }
        expected_prev = entry.entry_hash.as_str();
    }

    Ok(())
}

fn entry_hash(sequence: u64, prev_hash: &str, event: &AuditEvent, recorded_at: &str) -> String {
    let payload = format!("{}|{}|{}|{}", sequence, prev_hash, event, recorded_at);
    hash_data(payload.as_bytes())
}

/// Compute SHA-256 hash of data.
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
