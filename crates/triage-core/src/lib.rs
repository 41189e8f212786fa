//! Triage Core Library
//!
//! In-memory patient triage engine: patients are registered with an urgency
//! level, attended in urgency order, and attendances can be undone.
//!
//! # Architecture
//!
//! ```text
//!   register(name, level)
//!          │
//!          ▼
//!   ┌─────────────┐   append    ┌───────────────────────────────┐
//!   │  Registry   │◄────────────│         TriageEngine          │
//!   │ (all, in    │             │  ids + arrival counters       │
//!   │  creation   │             └──────┬─────────────────┬──────┘
//!   │  order)     │        insert /    │                 │  push /
//!   └─────────────┘        extract_min │                 │  pop (undo)
//!                                      ▼                 ▼
//!                            ┌─────────────────┐  ┌──────────────┐
//!                            │  WaitingQueue   │  │ HistoryStack │
//!                            │ (urgency, seq)  │  │    (LIFO)    │
//!                            └─────────────────┘  └──────────────┘
//! ```
//!
//! # Core Principle
//!
//! **A patient is in exactly one of the waiting queue and the history
//! stack.** Undo restores the original arrival sequence, so a patient regains
//! their place among equal-urgency patients.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, UrgencyLevel, Statistics)
//! - [`store`]: Registry, waiting queue and history stack
//! - [`engine`]: Orchestration of the three stores
//! - [`audit`]: Hash-chained journal of engine events
//! - [`export`]: Shift report export (JSON / CSV)
//! - [`config`], [`logging`]: Engine settings and tracing setup

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use audit::{AuditEntry, AuditEvent, AuditLog};
pub use config::EngineConfig;
pub use engine::TriageEngine;
pub use error::{TriageError, TriageResult};
pub use export::ShiftReport;
pub use models::{Patient, PatientId, PatientStatus, Statistics, UrgencyLevel};
pub use store::{HistoryStack, Registry, TriageKey, WaitingQueue};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TriageFfiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Empty queue: {0}")]
    EmptyQueue(String),

    #[error("Empty history: {0}")]
    EmptyStack(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<TriageError> for TriageFfiError {
    fn from(e: TriageError) -> Self {
        let message = e.to_string();
        match e {
            TriageError::InvalidInput(_) => TriageFfiError::InvalidInput(message),
            TriageError::InvalidState(_) => TriageFfiError::InvalidState(message),
            TriageError::EmptyQueue => TriageFfiError::EmptyQueue(message),
            TriageError::EmptyStack => TriageFfiError::EmptyStack(message),
        }
    }
}

impl From<serde_json::Error> for TriageFfiError {
    fn from(e: serde_json::Error) -> Self {
        TriageFfiError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for TriageFfiError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        TriageFfiError::InvalidState(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a triage service with default settings under a hospital name.
#[uniffi::export]
pub fn open_triage_service(hospital_name: String) -> Result<Arc<TriageService>, TriageFfiError> {
    let engine = TriageEngine::new(EngineConfig::with_hospital_name(hospital_name))?;
    Ok(Arc::new(TriageService::from_engine(engine)))
}

/// Create a triage service from a JSON [`EngineConfig`].
///
/// Also installs the tracing subscriber with the configured `log_filter`
/// unless one is already set.
#[uniffi::export]
pub fn open_triage_service_with_config(
    config_json: String,
) -> Result<Arc<TriageService>, TriageFfiError> {
    let config = EngineConfig::from_json(&config_json)?;
    logging::init_logging_from_config(&config);
    Ok(Arc::new(TriageService::from_engine(TriageEngine::new(config)?)))
}

/// Install the tracing subscriber. Returns false if one was already set.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    logging::init_logging(filter.as_deref().unwrap_or(config::DEFAULT_LOG_FILTER))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe engine wrapper for FFI.
///
/// Each call holds the lock for its whole duration, so operations that touch
/// two stores appear atomic to every other caller.
#[derive(uniffi::Object)]
pub struct TriageService {
    engine: Mutex<TriageEngine>,
}

impl TriageService {
    pub fn from_engine(engine: TriageEngine) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }
}

#[uniffi::export]
impl TriageService {
    // =========================================================================
    // Triage Operations
    // =========================================================================

    /// Register a new patient.
    pub fn register_patient(
        &self,
        name: String,
        urgency_level: u8,
    ) -> Result<FfiPatient, TriageFfiError> {
        let mut engine = self.engine.lock()?;
        let patient = engine.register(&name, urgency_level)?;
        Ok((&patient).into())
    }

    /// Attend the highest-priority waiting patient.
    pub fn attend_next(&self) -> Result<FfiPatient, TriageFfiError> {
        let mut engine = self.engine.lock()?;
        let patient = engine.attend_next()?;
        Ok((&patient).into())
    }

    /// Return the last attended patient to the waiting queue.
    pub fn undo_last_attendance(&self) -> Result<FfiPatient, TriageFfiError> {
        let mut engine = self.engine.lock()?;
        let patient = engine.undo_last_attendance()?;
        Ok((&patient).into())
    }

    /// Who would be attended next.
    pub fn peek_next(&self) -> Result<FfiPatient, TriageFfiError> {
        let engine = self.engine.lock()?;
        let patient = engine.peek_next()?;
        Ok(patient.into())
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Waiting patients in treatment order.
    pub fn waiting_report(&self) -> Result<Vec<FfiPatient>, TriageFfiError> {
        let engine = self.engine.lock()?;
        Ok(engine.waiting_report().into_iter().map(|p| p.into()).collect())
    }

    /// Attended patients, most recent first.
    pub fn history_report(&self, limit: Option<u32>) -> Result<Vec<FfiPatient>, TriageFfiError> {
        let engine = self.engine.lock()?;
        let patients = engine.history_report(limit.map(|l| l as usize));
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    pub fn statistics(&self) -> Result<FfiStatistics, TriageFfiError> {
        let engine = self.engine.lock()?;
        Ok(engine.statistics().into())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get a patient by ID.
    pub fn get_patient(&self, id: u64) -> Result<Option<FfiPatient>, TriageFfiError> {
        let engine = self.engine.lock()?;
        Ok(engine.patient(id).map(|p| p.into()))
    }

    /// Search patients by name.
    pub fn search_patients(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPatient>, TriageFfiError> {
        let engine = self.engine.lock()?;
        let patients = engine.search_patients(&query, limit as usize);
        Ok(patients.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Export & Audit
    // =========================================================================

    /// Export the shift report as JSON.
    pub fn export_report_json(&self, history_limit: Option<u32>) -> Result<String, TriageFfiError> {
        let engine = self.engine.lock()?;
        let report = ShiftReport::generate(&engine, history_limit.map(|l| l as usize));
        Ok(report.to_json()?)
    }

    /// Export the shift report as CSV.
    pub fn export_report_csv(&self, history_limit: Option<u32>) -> Result<String, TriageFfiError> {
        let engine = self.engine.lock()?;
        let report = ShiftReport::generate(&engine, history_limit.map(|l| l as usize));
        Ok(report.to_csv())
    }

    /// Current head of the audit journal.
    pub fn audit_head_hash(&self) -> Result<String, TriageFfiError> {
        let engine = self.engine.lock()?;
        Ok(engine.audit_log().head_hash().to_string())
    }

    /// Recompute the audit chain.
    pub fn verify_audit_log(&self) -> Result<bool, TriageFfiError> {
        let engine = self.engine.lock()?;
        Ok(engine.audit_log().verify().is_ok())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiPatient {
    pub id: u64,
    pub name: String,
    pub urgency_level: u8,
    pub urgency_name: String,
    pub urgency_description: String,
    pub status: String,
    pub registered_at: String,
}

impl From<&Patient> for FfiPatient {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id(),
            name: patient.name().to_string(),
            urgency_level: patient.urgency().level(),
            urgency_name: patient.urgency().color_name().to_string(),
            urgency_description: patient.urgency().description().to_string(),
            status: patient.status().as_str().to_string(),
            registered_at: patient.registered_at().to_string(),
        }
    }
}

/// FFI-safe per-level count.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiUrgencyCount {
    pub urgency_level: u8,
    pub count: u64,
}

/// FFI-safe statistics.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiStatistics {
    pub total_registered: u64,
    pub total_waiting: u64,
    pub total_attended: u64,
    pub count_by_urgency: Vec<FfiUrgencyCount>,
}

impl From<Statistics> for FfiStatistics {
    fn from(stats: Statistics) -> Self {
        Self {
            total_registered: stats.total_registered as u64,
            total_waiting: stats.total_waiting as u64,
            total_attended: stats.total_attended as u64,
            count_by_urgency: stats
                .count_by_urgency
                .into_iter()
                .map(|(level, count)| FfiUrgencyCount {
                    urgency_level: level.level(),
                    count: count as u64,
                })
                .collect(),
        }
    }
}
