//! Triage engine: ties the registry, waiting queue and history stack
//! together.
//!
//! Every public operation checks its preconditions before touching any
//! store, so a failed call leaves all three stores unchanged.

use tracing::{debug, error, info};

use crate::audit::{AuditEvent, AuditLog};
use crate::config::EngineConfig;
use crate::error::{TriageError, TriageResult};
use crate::models::{Patient, PatientId, PatientStatus, Statistics};
use crate::store::{HistoryEntry, HistoryStack, Registry, WaitingQueue};

/// Single-threaded triage engine owning all patient state.
///
/// For shared access wrap it in one lock; see [`crate::TriageService`].
#[derive(Debug)]
pub struct TriageEngine {
    config: EngineConfig,
    shift_id: String,
    registry: Registry,
    waiting: WaitingQueue,
    history: HistoryStack,
    audit: AuditLog,
    next_id: PatientId,
    next_arrival: u64,
}

impl Default for TriageEngine {
    fn default() -> Self {
        // The default configuration always validates
        Self::from_valid_config(EngineConfig::default())
    }
}

impl TriageEngine {
    /// Build an engine, rejecting an invalid configuration with
    /// `InvalidInput`.
    pub fn new(config: EngineConfig) -> TriageResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EngineConfig) -> Self {
        let shift_id = uuid::Uuid::new_v4().to_string();
        info!(%shift_id, hospital = %config.hospital_name, "triage engine started");
        Self {
            config,
            shift_id,
            registry: Registry::new(),
            waiting: WaitingQueue::new(),
            history: HistoryStack::new(),
            audit: AuditLog::new(),
            next_id: 1,
            next_arrival: 0,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Register a patient and place them in the waiting queue.
    ///
    /// Counters only advance once the input is valid.
    pub fn register(&mut self, name: &str, urgency_level: u8) -> TriageResult<Patient> {
        let patient = Patient::new(self.next_id, self.next_arrival, name, urgency_level)?;
        self.waiting.insert(&patient)?;

        self.next_id += 1;
        self.next_arrival += 1;

        info!(
            patient_id = patient.id(),
            urgency = %patient.urgency(),
            "patient registered"
        );
        self.record(AuditEvent::Registered {
            patient_id: patient.id(),
            urgency: patient.urgency(),
        });

        self.registry.append(patient.clone());
        Ok(patient)
    }

    /// Attend the highest-priority waiting patient.
    pub fn attend_next(&mut self) -> TriageResult<Patient> {
        let key = self.waiting.peek_min().map_err(|e| {
            debug!("attend requested with empty waiting queue");
            e
        })?;
        self.expect_status(key.patient_id, PatientStatus::Waiting)?;

        self.waiting.extract_min()?;
        let patient = self
            .registry
            .get_mut(key.patient_id)
            .ok_or_else(|| missing(key.patient_id))?;
        patient.transition(PatientStatus::Attended)?;
        self.history.push(patient)?;
        let patient = patient.clone();

        info!(
            patient_id = patient.id(),
            urgency = %patient.urgency(),
            waiting = self.waiting.len(),
            "patient attended"
        );
        self.record(AuditEvent::Attended {
            patient_id: patient.id(),
        });
        Ok(patient)
    }

    /// Return the most recently attended patient to the waiting queue with
    /// their original arrival sequence.
    pub fn undo_last_attendance(&mut self) -> TriageResult<Patient> {
        let patient_id = self
            .history
            .peek()
            .map_err(|e| {
                debug!("undo requested with empty history");
                e
            })?
            .patient_id;
        self.expect_status(patient_id, PatientStatus::Attended)?;
        if self.waiting.contains(patient_id) {
            return Err(self.defect(format!("patient {} is already waiting", patient_id)));
        }

        self.history.pop()?;
        let patient = self
            .registry
            .get_mut(patient_id)
            .ok_or_else(|| missing(patient_id))?;
        patient.transition(PatientStatus::Waiting)?;
        self.waiting.insert(patient)?;
        let patient = patient.clone();

        info!(
            patient_id = patient.id(),
            arrival_sequence = patient.arrival_sequence(),
            "attendance undone"
        );
        self.record(AuditEvent::AttendanceUndone {
            patient_id: patient.id(),
        });
        Ok(patient)
    }

    /// The patient who would be attended next, without dispatching.
    pub fn peek_next(&self) -> TriageResult<&Patient> {
        let key = self.waiting.peek_min()?;
        self.registry.get(key.patient_id).ok_or_else(|| missing(key.patient_id))
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Waiting patients in treatment order.
    pub fn waiting_report(&self) -> Vec<&Patient> {
        let keys = self.waiting.snapshot_sorted();
        debug!(count = keys.len(), "waiting report");
        keys.iter()
            .filter_map(|key| self.registry.get(key.patient_id))
            .collect()
    }

    /// Attended patients, most recent first. Falls back to the configured
    /// default limit when `limit` is `None`.
    pub fn history_report(&self, limit: Option<usize>) -> Vec<&Patient> {
        self.history_entries(limit)
            .into_iter()
            .filter_map(|entry| self.registry.get(entry.patient_id))
            .collect()
    }

    /// Raw history entries (with attendance times), most recent first.
    pub fn history_entries(&self, limit: Option<usize>) -> Vec<&HistoryEntry> {
        let limit = limit.or(self.config.default_history_limit);
        self.history.snapshot_recent_first(limit)
    }

    /// Counts derived from the registry. O(n), read-only.
    pub fn statistics(&self) -> Statistics {
        Statistics::from_patients(self.registry.snapshot())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.registry.get(id)
    }

    /// Every patient ever registered, in creation order.
    pub fn registry_snapshot(&self) -> std::slice::Iter<'_, Patient> {
        self.registry.snapshot()
    }

    /// Fuzzy name search over the registry.
    pub fn search_patients(&self, query: &str, limit: usize) -> Vec<&Patient> {
        self.registry.search_by_name(query, limit)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn hospital_name(&self) -> &str {
        &self.config.hospital_name
    }

    pub fn shift_id(&self) -> &str {
        &self.shift_id
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    pub fn attended_count(&self) -> usize {
        self.history.len()
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    /// Verify that every registered patient sits in exactly one of the
    /// waiting queue and history stack, matching its status.
    pub fn check_invariants(&self) -> TriageResult<()> {
        if self.waiting.len() + self.history.len() != self.registry.len() {
            return Err(self.defect(format!(
                "{} waiting + {} attended != {} registered",
                self.waiting.len(),
                self.history.len(),
                self.registry.len()
            )));
        }

        for entry in self.history.snapshot_recent_first(None) {
            match self.registry.get(entry.patient_id) {
                Some(p) if p.status() == PatientStatus::Attended => {}
                _ => {
                    return Err(self.defect(format!(
                        "history entry {} is not an attended patient",
                        entry.patient_id
                    )))
                }
            }
        }

        for patient in self.registry.snapshot() {
            let waiting = self.waiting.contains(patient.id());
            if waiting != patient.is_waiting() {
                return Err(self.defect(format!(
                    "patient {} has status {} but queue membership is {}",
                    patient.id(),
                    patient.status().as_str(),
                    waiting
                )));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn expect_status(&self, id: PatientId, expected: PatientStatus) -> TriageResult<()> {
        let patient = self.registry.get(id).ok_or_else(|| missing(id))?;
        if patient.status() != expected {
            return Err(self.defect(format!(
                "patient {} is {}, expected {}",
                id,
                patient.status().as_str(),
                expected.as_str()
            )));
        }
        Ok(())
    }

    fn defect(&self, message: String) -> TriageError {
        error!(shift_id = %self.shift_id, "{}", message);
        TriageError::InvalidState(message)
    }

    fn record(&mut self, event: AuditEvent) {
        if self.config.audit_enabled {
            self.audit.record(event);
        }
    }
}

fn missing(id: PatientId) -> TriageError {
    TriageError::InvalidState(format!("patient {} is not in the registry", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(levels: &[u8]) -> TriageEngine {
        let mut engine = TriageEngine::default();
        for (i, level) in levels.iter().enumerate() {
            engine.register(&format!("P{}", i + 1), *level).unwrap();
        }
        engine
    }

    #[test]
    fn test_counters_start_at_one() {
        let engine = engine_with(&[3, 3]);
        let ids: Vec<u64> = engine.registry_snapshot().map(|p| p.id()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(engine.next_arrival, 2);
    }

    #[test]
    fn test_check_invariants_detects_lost_patient() {
        let mut engine = engine_with(&[1, 2]);
        engine.check_invariants().unwrap();

        // Drop a patient from the queue behind the engine's back
        engine.waiting.extract_min().unwrap();
        assert!(matches!(
            engine.check_invariants(),
            Err(TriageError::InvalidState(_))
        ));
    }

    #[test]
    fn test_attend_refuses_inconsistent_status() {
        let mut engine = engine_with(&[1]);
        engine
            .registry
            .get_mut(1)
            .unwrap()
            .transition(PatientStatus::Attended)
            .unwrap();

        let err = engine.attend_next().unwrap_err();
        assert!(err.is_defect());
        // Nothing moved
        assert_eq!(engine.waiting.len(), 1);
        assert!(engine.history.is_empty());
    }

    #[test]
    fn test_undo_refuses_patient_already_waiting() {
        let mut engine = engine_with(&[1]);
        engine.attend_next().unwrap();
        engine
            .registry
            .get_mut(1)
            .unwrap()
            .transition(PatientStatus::Waiting)
            .unwrap();

        let err = engine.undo_last_attendance().unwrap_err();
        assert!(err.is_defect());
        assert_eq!(engine.history.len(), 1);
    }

    #[test]
    fn test_shift_ids_differ() {
        let a = TriageEngine::default();
        let b = TriageEngine::default();
        assert_ne!(a.shift_id(), b.shift_id());
        assert_eq!(a.hospital_name(), crate::config::DEFAULT_HOSPITAL_NAME);
    }
}
