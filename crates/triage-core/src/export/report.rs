//! Shift report export.

use serde::Serialize;
use tracing::debug;

use crate::engine::TriageEngine;
use crate::models::{Patient, PatientId, Statistics};

/// Snapshot of the engine at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct ShiftReport {
    pub metadata: ReportMetadata,
    /// Waiting patients in treatment order
    pub waiting: Vec<PatientRow>,
    /// Attended patients, most recent first
    pub history: Vec<PatientRow>,
    pub statistics: Statistics,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub hospital_name: String,
    /// Engine instance the report came from
    pub shift_id: String,
    /// Export timestamp
    pub generated_at: String,
    /// Audit journal head at export time, for traceability
    pub audit_head_hash: String,
}

/// One patient line in a report.
#[derive(Debug, Clone, Serialize)]
pub struct PatientRow {
    /// 1-based position within its section
    pub position: usize,
    pub patient_id: PatientId,
    pub name: String,
    pub urgency_level: u8,
    pub urgency_color: String,
    pub urgency_description: String,
    pub status: String,
    pub registered_at: String,
    /// Only set for history rows
    pub attended_at: Option<String>,
}

impl PatientRow {
    fn from_patient(position: usize, patient: &Patient, attended_at: Option<&str>) -> Self {
        Self {
            position,
            patient_id: patient.id(),
            name: patient.name().to_string(),
            urgency_level: patient.urgency().level(),
            urgency_color: patient.urgency().color_name().to_string(),
            urgency_description: patient.urgency().description().to_string(),
            status: patient.status().as_str().to_string(),
            registered_at: patient.registered_at().to_string(),
            attended_at: attended_at.map(str::to_string),
        }
    }
}

impl ShiftReport {
    /// Build a report from the engine's read-only views.
    pub fn generate(engine: &TriageEngine, history_limit: Option<usize>) -> Self {
        let waiting = engine
            .waiting_report()
            .into_iter()
            .enumerate()
            .map(|(i, p)| PatientRow::from_patient(i + 1, p, None))
            .collect();

        let history: Vec<PatientRow> = engine
            .history_entries(history_limit)
            .into_iter()
            .filter_map(|entry| {
                engine
                    .patient(entry.patient_id)
                    .map(|p| (p, entry.attended_at.as_str()))
            })
            .enumerate()
            .map(|(i, (p, at))| PatientRow::from_patient(i + 1, p, Some(at)))
            .collect();

        debug!(history = history.len(), "shift report generated");

        Self {
            metadata: ReportMetadata {
                hospital_name: engine.hospital_name().to_string(),
                shift_id: engine.shift_id().to_string(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                audit_head_hash: engine.audit_log().head_hash().to_string(),
            },
            waiting,
            history,
            statistics: engine.statistics(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one row per patient line.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("section,position,patient_id,name,urgency_level,urgency_color,status,registered_at,attended_at,shift_id\n");

        let sections = [("waiting", &self.waiting), ("history", &self.history)];
        for (section, rows) in sections {
            for row in rows {
                csv.push_str(&format!(
                    "{},{},{},{},{},{},{},{},{},{}\n",
                    section,
                    row.position,
                    row.patient_id,
                    escape_csv(&row.name),
                    row.urgency_level,
                    row.urgency_color,
                    row.status,
                    escape_csv(&row.registered_at),
                    row.attended_at.as_deref().unwrap_or(""),
                    escape_csv(&self.metadata.shift_id),
                ));
            }
        }

        csv
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
