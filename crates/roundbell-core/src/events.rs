use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every timer state change produces an Event.
/// Presentation layers render them; the app facade reacts to completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        round: u32,
        is_break: bool,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A round finished and a break began.
    BreakStarted {
        after_round: u32,
        duration_secs: u32,
        fact: String,
        at: DateTime<Utc>,
    },
    /// A break finished and the next round began.
    RoundStarted {
        round: u32,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// The last round finished; the session should be recorded.
    WorkoutCompleted {
        completed_rounds: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        is_running: bool,
        is_break: bool,
        current_round: u32,
        total_rounds: u32,
        remaining_secs: u32,
        phase_progress: f64,
        status_message: Option<String>,
        at: DateTime<Utc>,
    },
}
