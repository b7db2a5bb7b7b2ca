//! Workout settings and their manager.
//!
//! Settings are a single JSON document (`settings` key) holding the round
//! duration, break duration, round count and theme. It is loaded once at
//! startup and rewritten whole on every update.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ValidationError;
use crate::storage::{KvStore, WriteBehind, SETTINGS_KEY};

/// Longest round or break the duration pickers allow (60 min 59 s).
pub const MAX_DURATION_SECS: u32 = 60 * 60 + 59;
/// Most rounds a workout can have.
pub const MAX_ROUNDS: u32 = 20;

/// Cosmetic color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Green,
    Blue,
    Red,
    Yellow,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Green, Theme::Blue, Theme::Red, Theme::Yellow];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Yellow => "yellow",
        }
    }

    /// Start and end color of the theme's background gradient.
    pub fn gradient(&self) -> [&'static str; 2] {
        match self {
            Self::Green => ["#11998e", "#38ef7d"],
            Self::Blue => ["#2193b0", "#6dd5ed"],
            Self::Red => ["#cb2d3e", "#ef473a"],
            Self::Yellow => ["#f7971e", "#ffd200"],
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "theme".into(),
                message: format!("unknown theme '{s}' (expected green, blue, red or yellow)"),
            })
    }
}

/// User-configured workout shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Seconds per round, at least 1.
    pub round_duration: u32,
    /// Seconds per break, may be 0.
    pub break_duration: u32,
    pub rounds: u32,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_duration: 180,
            break_duration: 60,
            rounds: 3,
            theme: Theme::Green,
        }
    }
}

impl Settings {
    /// Force every field into its allowed range. Returns the names of the
    /// fields that had to change.
    pub fn clamp(&mut self) -> Vec<&'static str> {
        let mut changed = Vec::new();
        let round = self.round_duration.clamp(1, MAX_DURATION_SECS);
        if round != self.round_duration {
            self.round_duration = round;
            changed.push("roundDuration");
        }
        let brk = self.break_duration.min(MAX_DURATION_SECS);
        if brk != self.break_duration {
            self.break_duration = brk;
            changed.push("breakDuration");
        }
        let rounds = self.rounds.clamp(1, MAX_ROUNDS);
        if rounds != self.rounds {
            self.rounds = rounds;
            changed.push("rounds");
        }
        changed
    }

    /// Apply the fields present in `patch`.
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.round_duration {
            self.round_duration = v;
        }
        if let Some(v) = patch.break_duration {
            self.break_duration = v;
        }
        if let Some(v) = patch.rounds {
            self.rounds = v;
        }
        if let Some(v) = patch.theme {
            self.theme = v;
        }
    }
}

/// Partial settings update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Owns the live [`Settings`] and persists them on every change.
pub struct SettingsManager {
    settings: Settings,
    writer: WriteBehind,
}

impl SettingsManager {
    pub fn new(settings: Settings, writer: WriteBehind) -> Self {
        Self { settings, writer }
    }

    /// Read the persisted document and persist future changes via `writer`.
    pub fn load(store: &dyn KvStore, writer: WriteBehind) -> Self {
        Self::new(Self::read(store), writer)
    }

    /// Read the persisted document, falling back to defaults when it is
    /// absent or unreadable.
    pub fn read(store: &dyn KvStore) -> Settings {
        match store.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(mut parsed) => {
                    let clamped = parsed.clamp();
                    if !clamped.is_empty() {
                        warn!(fields = ?clamped, "persisted settings out of range; clamped");
                    }
                    info!(
                        round_duration = parsed.round_duration,
                        break_duration = parsed.break_duration,
                        rounds = parsed.rounds,
                        "settings loaded"
                    );
                    parsed
                }
                Err(err) => {
                    warn!("malformed settings document, using defaults: {err}");
                    Settings::default()
                }
            },
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!("failed to read settings, using defaults: {err}");
                Settings::default()
            }
        }
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Merge `patch`, clamp into range, persist the whole document.
    pub fn update(&mut self, patch: &SettingsPatch) -> &Settings {
        let mut updated = self.settings.clone();
        updated.merge(patch);
        let clamped = updated.clamp();
        if !clamped.is_empty() {
            warn!(fields = ?clamped, "settings update out of range; clamped");
        }
        self.settings = updated;
        self.persist();
        &self.settings
    }

    fn persist(&self) {
        match serde_json::to_string(&self.settings) {
            Ok(json) => self.writer.write(SETTINGS_KEY, json),
            Err(err) => warn!("failed to encode settings: {err}"),
        }
    }
}
