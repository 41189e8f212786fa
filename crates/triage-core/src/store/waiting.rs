//! Urgency-ordered waiting queue.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use crate::error::{TriageError, TriageResult};
use crate::models::{Patient, PatientId, PatientStatus, UrgencyLevel};

/// Composite priority key: urgency first, then arrival order.
///
/// Keys compare by `(urgency, arrival_sequence)`; the patient id only breaks
/// ties between keys that should never be equal in practice, keeping the
/// order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriageKey {
    pub urgency: UrgencyLevel,
    pub arrival_sequence: u64,
    pub patient_id: PatientId,
}

impl TriageKey {
    pub fn for_patient(patient: &Patient) -> Self {
        Self {
            urgency: patient.urgency(),
            arrival_sequence: patient.arrival_sequence(),
            patient_id: patient.id(),
        }
    }
}

impl Ord for TriageKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.urgency
            .cmp(&other.urgency)
            .then(self.arrival_sequence.cmp(&other.arrival_sequence))
            .then(self.patient_id.cmp(&other.patient_id))
    }
}

impl PartialOrd for TriageKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of waiting patients keyed by [`TriageKey`].
#[derive(Debug, Default, Clone)]
pub struct WaitingQueue {
    heap: BinaryHeap<Reverse<TriageKey>>,
    members: HashSet<PatientId>,
}

impl WaitingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a waiting patient. O(log n).
    ///
    /// Fails with `InvalidState` if the patient is not `Waiting` or is
    /// already queued.
    pub fn insert(&mut self, patient: &Patient) -> TriageResult<()> {
        if patient.status() != PatientStatus::Waiting {
            return Err(TriageError::InvalidState(format!(
                "cannot queue patient {} with status {}",
                patient.id(),
                patient.status().as_str()
            )));
        }
        if self.members.contains(&patient.id()) {
            return Err(TriageError::InvalidState(format!(
                "patient {} is already in the waiting queue",
                patient.id()
            )));
        }

        self.members.insert(patient.id());
        self.heap.push(Reverse(TriageKey::for_patient(patient)));
        Ok(())
    }

    /// Remove and return the highest-priority key. O(log n).
    pub fn extract_min(&mut self) -> TriageResult<TriageKey> {
        let Reverse(key) = self.heap.pop().ok_or(TriageError::EmptyQueue)?;
        self.members.remove(&key.patient_id);
        Ok(key)
    }

    /// The highest-priority key without removing it. O(1).
    pub fn peek_min(&self) -> TriageResult<TriageKey> {
        self.heap
            .peek()
            .map(|Reverse(key)| *key)
            .ok_or(TriageError::EmptyQueue)
    }

    /// All keys in treatment order. O(n log n), leaves the heap untouched.
    ///
    /// For display only; dispatch goes through `extract_min`/`peek_min`.
    pub fn snapshot_sorted(&self) -> Vec<TriageKey> {
        let mut keys: Vec<TriageKey> = self.heap.iter().map(|Reverse(key)| *key).collect();
        keys.sort_unstable();
        keys
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
