//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{TriageError, TriageResult};

pub const DEFAULT_HOSPITAL_NAME: &str = "HOSPITAL URGENCY SYSTEM";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "triage_core=info";

/// Settings for a [`crate::TriageEngine`] instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shown on reports
    pub hospital_name: String,
    /// History report size when the caller gives no limit; `None` means all
    pub default_history_limit: Option<usize>,
    /// Record register/attend/undo events in the audit journal
    pub audit_enabled: bool,
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hospital_name: DEFAULT_HOSPITAL_NAME.to_string(),
            default_history_limit: None,
            audit_enabled: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    /// Default settings under another hospital name.
    pub fn with_hospital_name(name: impl Into<String>) -> Self {
        Self {
            hospital_name: name.into(),
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> TriageResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| TriageError::InvalidInput(format!("invalid engine config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TriageResult<()> {
        if self.hospital_name.trim().is_empty() {
            return Err(TriageError::InvalidInput(
                "hospital name cannot be empty".into(),
            ));
        }
        if self.default_history_limit == Some(0) {
            return Err(TriageError::InvalidInput(
                "default history limit must be positive".into(),
            ));
        }
        Ok(())
    }
}
