use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How hard a workout felt, set after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ValidationError::InvalidValue {
                field: "difficulty".into(),
                message: format!("unknown difficulty '{s}' (expected easy, medium or hard)"),
            }),
        }
    }
}

/// One completed or explicitly saved workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: String,
    /// Creation time, epoch milliseconds.
    pub date: u64,
    pub round_duration: u32,
    pub break_duration: u32,
    pub total_rounds: u32,
    pub completed_rounds: u32,
    /// Wall-clock seconds from session start to save.
    pub total_time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkoutRecord {
    /// Fresh, time-ordered record id.
    pub fn new_id() -> String {
        uuid::Uuid::now_v7().to_string()
    }

    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.date as i64).single()
    }

    pub fn is_full(&self) -> bool {
        self.completed_rounds >= self.total_rounds
    }
}
