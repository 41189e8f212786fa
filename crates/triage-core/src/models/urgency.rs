//! Triage urgency levels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// Medical urgency, following the five-colour triage scale.
///
/// Ordering follows priority: `Red < Orange < ... < Blue`, so the smallest
/// value is treated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UrgencyLevel {
    /// Life-threatening emergency
    Red = 1,
    /// Emergency
    Orange = 2,
    /// Urgency
    Yellow = 3,
    /// Minor urgency
    Green = 4,
    /// Non-urgent
    Blue = 5,
}

impl UrgencyLevel {
    /// All levels, most urgent first.
    pub const ALL: [UrgencyLevel; 5] = [
        UrgencyLevel::Red,
        UrgencyLevel::Orange,
        UrgencyLevel::Yellow,
        UrgencyLevel::Green,
        UrgencyLevel::Blue,
    ];

    /// Numeric level (1 = most urgent).
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Colour code shown to staff.
    pub fn color_name(self) -> &'static str {
        match self {
            UrgencyLevel::Red => "RED",
            UrgencyLevel::Orange => "ORANGE",
            UrgencyLevel::Yellow => "YELLOW",
            UrgencyLevel::Green => "GREEN",
            UrgencyLevel::Blue => "BLUE",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            UrgencyLevel::Red => "Life-threatening emergency",
            UrgencyLevel::Orange => "Emergency",
            UrgencyLevel::Yellow => "Urgency",
            UrgencyLevel::Green => "Minor urgency",
            UrgencyLevel::Blue => "Non-urgent",
        }
    }
}

impl TryFrom<u8> for UrgencyLevel {
    type Error = TriageError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(UrgencyLevel::Red),
            2 => Ok(UrgencyLevel::Orange),
            3 => Ok(UrgencyLevel::Yellow),
            4 => Ok(UrgencyLevel::Green),
            5 => Ok(UrgencyLevel::Blue),
            other => Err(TriageError::InvalidInput(format!(
                "urgency level must be between 1 and 5, got {}",
                other
            ))),
        }
    }
}

impl From<UrgencyLevel> for u8 {
    fn from(level: UrgencyLevel) -> Self {
        level.level()
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color_name())
    }
}
