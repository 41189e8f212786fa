//! Append-only chronological patient registry.

use std::collections::HashMap;

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::models::{Patient, PatientId};

/// Minimum similarity for a name search hit.
const SEARCH_THRESHOLD: f64 = 0.5;

/// Every patient ever registered, in creation order. Nothing is removed.
#[derive(Debug, Default)]
pub struct Registry {
    patients: Vec<Patient>,
    index: HashMap<PatientId, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a patient. Ids must be unique; the engine never reuses one.
    pub fn append(&mut self, patient: Patient) {
        debug_assert!(
            !self.index.contains_key(&patient.id()),
            "patient {} appended twice",
            patient.id()
        );
        self.index.insert(patient.id(), self.patients.len());
        self.patients.push(patient);
    }

    pub fn get(&self, id: PatientId) -> Option<&Patient> {
        self.index.get(&id).map(|&i| &self.patients[i])
    }

    pub(crate) fn get_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        match self.index.get(&id) {
            Some(&i) => self.patients.get_mut(i),
            None => None,
        }
    }

    /// Read-only view in creation order. The iterator is `Clone`, so it can
    /// be restarted, and it always reflects current status values.
    pub fn snapshot(&self) -> std::slice::Iter<'_, Patient> {
        self.patients.iter()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Fuzzy search by name, best match first.
    pub fn search_by_name(&self, query: &str, limit: usize) -> Vec<&Patient> {
        let query = query.trim().to_lowercase();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f64, usize)> = self
            .patients
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                let score = name_score(&query, &p.name().to_lowercase());
                (score >= SEARCH_THRESHOLD).then_some((score, i))
            })
            .collect();

        // Stable on creation order for equal scores
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        scored
            .into_iter()
            .take(limit)
            .map(|(_, i)| &self.patients[i])
            .collect()
    }
}

/// Best of a whole-name match and a per-word match, so "lopez" finds
/// "María López" as well as "lopes".
fn name_score(query: &str, name: &str) -> f64 {
    if name.contains(query) {
        return 1.0;
    }
    let whole = fuzzy_match(query, name);
    name.split_whitespace()
        .map(|word| fuzzy_match(query, word))
        .fold(whole, f64::max)
}

fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler favours shared prefixes, Levenshtein overall edits
    jaro_winkler(a, b) * 0.6 + normalized_levenshtein(a, b) * 0.4
}
