//! Registry-derived statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{Patient, PatientStatus, UrgencyLevel};

/// Counts over every patient ever registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_registered: usize,
    pub total_waiting: usize,
    pub total_attended: usize,
    /// Only levels with at least one patient appear
    pub count_by_urgency: BTreeMap<UrgencyLevel, usize>,
}

impl Statistics {
    /// Fold a sequence of patients into counts. Status is read live.
    pub fn from_patients<'a, I>(patients: I) -> Self
    where
        I: IntoIterator<Item = &'a Patient>,
    {
        let mut stats = Statistics::default();
        for patient in patients {
            stats.total_registered += 1;
            match patient.status() {
                PatientStatus::Waiting => stats.total_waiting += 1,
                PatientStatus::Attended => stats.total_attended += 1,
            }
            *stats.count_by_urgency.entry(patient.urgency()).or_insert(0) += 1;
        }
        stats
    }

    pub fn count_for(&self, level: UrgencyLevel) -> usize {
        self.count_by_urgency.get(&level).copied().unwrap_or(0)
    }
}
