//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use internal
//! threads or timers - the caller delivers `tick()` once per second while
//! [`TimerEngine::should_tick`] holds, and stops as soon as it does not.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Round(1) -> Break -> Round(2) -> ... -> Round(n) -> Complete
//!   ^                                                            |
//!   +------------------------- reset ----------------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(&settings);
//! engine.start(&settings, now_ms);
//! // Once per second, while engine.should_tick():
//! if let Some(Event::WorkoutCompleted { .. }) = engine.tick(&settings) {
//!     // record the workout
//! }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::Event;
use crate::facts;
use crate::settings::Settings;

/// Banner shown once the final round ends.
pub const COMPLETION_MESSAGE: &str = "Workout Complete! Great job!";

/// Coarse phase derived from [`TimerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Fresh session: round 1, full time, never started.
    Idle,
    Round,
    Break,
    /// Terminal display state after the last round.
    Complete,
}

/// Observable timer state, rendered by presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub is_running: bool,
    pub is_break: bool,
    /// 1-based round number.
    pub current_round: u32,
    /// Seconds left in the current round or break.
    pub remaining_time: u32,
    /// Completion banner; only set once the workout is complete.
    pub status_message: Option<String>,
    pub current_fact: String,
}

/// Bookkeeping for the workout in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutSession {
    /// Wall-clock start of the session (epoch milliseconds).
    pub started_ms: u64,
    /// Settings in effect when the session started.
    pub settings: Settings,
}

impl WorkoutSession {
    /// Whole seconds elapsed between the session start and `now_ms`.
    pub fn elapsed_secs(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_ms) / 1000
    }
}

/// Core timer engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
    session: Option<WorkoutSession>,
}

impl TimerEngine {
    /// Create an engine showing a full first round.
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: TimerState {
                is_running: false,
                is_break: false,
                current_round: 1,
                remaining_time: settings.round_duration,
                status_message: None,
                current_fact: facts::FACTS[0].to_string(),
            },
            session: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn session(&self) -> Option<&WorkoutSession> {
        self.session.as_ref()
    }

    /// Whether the caller should keep delivering ticks.
    pub fn should_tick(&self) -> bool {
        self.state.is_running && self.state.status_message.is_none()
    }

    /// Not running, not on a break, still on round 1.
    ///
    /// Settings edits in this state refresh the displayed countdown.
    pub fn is_idle(&self) -> bool {
        !self.state.is_running && !self.state.is_break && self.state.current_round == 1
    }

    pub fn phase(&self) -> Phase {
        if self.state.status_message.is_some() {
            Phase::Complete
        } else if self.state.is_break {
            Phase::Break
        } else if self.is_idle() && self.session.is_none() {
            Phase::Idle
        } else {
            Phase::Round
        }
    }

    /// Length of the phase the timer is currently in.
    pub fn phase_duration(&self, settings: &Settings) -> u32 {
        if self.state.is_break {
            settings.break_duration
        } else {
            settings.round_duration
        }
    }

    /// 0.0 .. 1.0 progress within the current round or break.
    pub fn phase_progress(&self, settings: &Settings) -> f64 {
        let total = self.phase_duration(settings);
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.state.remaining_time as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, settings: &Settings) -> Event {
        Event::StateSnapshot {
            phase: self.phase(),
            is_running: self.state.is_running,
            is_break: self.state.is_break,
            current_round: self.state.current_round,
            total_rounds: self.session_rounds(settings),
            remaining_secs: self.state.remaining_time,
            phase_progress: self.phase_progress(settings),
            status_message: self.state.status_message.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume. The first start of a session records its start time
    /// and a settings snapshot.
    pub fn start(&mut self, settings: &Settings, now_ms: u64) -> Event {
        if self.session.is_none() {
            self.session = Some(WorkoutSession {
                started_ms: now_ms,
                settings: settings.clone(),
            });
            debug!(started_ms = now_ms, "workout session started");
        }
        self.state.is_running = true;
        self.state.status_message = None;
        Event::TimerStarted {
            round: self.state.current_round,
            is_break: self.state.is_break,
            remaining_secs: self.state.remaining_time,
            at: Utc::now(),
        }
    }

    /// Stop ticking. Returns an event only if the timer was running.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        Some(Event::TimerPaused {
            remaining_secs: self.state.remaining_time,
            at: Utc::now(),
        })
    }

    /// Back to a fresh round 1 and drop the session. Always allowed.
    pub fn reset(&mut self, settings: &Settings) -> Event {
        self.state = TimerState {
            is_running: false,
            is_break: false,
            current_round: 1,
            remaining_time: settings.round_duration,
            status_message: None,
            current_fact: facts::pick().to_string(),
        };
        self.session = None;
        Event::TimerReset { at: Utc::now() }
    }

    /// Advance by one second. Returns an event on phase boundaries.
    ///
    /// Ignored unless [`should_tick`](Self::should_tick) holds.
    pub fn tick(&mut self, settings: &Settings) -> Option<Event> {
        if !self.should_tick() {
            return None;
        }

        if self.state.remaining_time > 1 {
            self.state.remaining_time -= 1;
            return None;
        }

        let rounds = self.session_rounds(settings);
        if self.state.current_round >= rounds {
            return Some(self.complete());
        }

        if !self.state.is_break {
            self.state.is_break = true;
            self.state.remaining_time = settings.break_duration;
            self.state.current_fact = facts::pick().to_string();
            debug!(after_round = self.state.current_round, "break started");
            return Some(Event::BreakStarted {
                after_round: self.state.current_round,
                duration_secs: settings.break_duration,
                fact: self.state.current_fact.clone(),
                at: Utc::now(),
            });
        }

        self.state.is_break = false;
        self.state.current_round += 1;
        self.state.remaining_time = settings.round_duration;
        debug!(round = self.state.current_round, "round started");
        Some(Event::RoundStarted {
            round: self.state.current_round,
            duration_secs: settings.round_duration,
            at: Utc::now(),
        })
    }

    /// Round count of the session in progress, fixed when it started.
    fn session_rounds(&self, settings: &Settings) -> u32 {
        self.session
            .as_ref()
            .map_or(settings.rounds, |s| s.settings.rounds)
    }

    fn complete(&mut self) -> Event {
        self.state.is_running = false;
        self.state.is_break = false;
        self.state.remaining_time = 0;
        self.state.status_message = Some(COMPLETION_MESSAGE.to_string());
        debug!(rounds = self.state.current_round, "final round finished");
        Event::WorkoutCompleted {
            completed_rounds: self.state.current_round,
            at: Utc::now(),
        }
    }

    /// Refresh the displayed countdown after a settings edit, only when idle.
    /// Returns whether the display changed.
    pub fn show_round_duration(&mut self, round_duration: u32) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state.remaining_time = round_duration;
        true
    }

    /// Remove and return the active session, if any.
    pub fn take_session(&mut self) -> Option<WorkoutSession> {
        self.session.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(round: u32, brk: u32, rounds: u32) -> Settings {
        Settings {
            round_duration: round,
            break_duration: brk,
            rounds,
            ..Default::default()
        }
    }

    fn tick_n(engine: &mut TimerEngine, settings: &Settings, n: usize) -> Vec<Event> {
        (0..n).filter_map(|_| engine.tick(settings)).collect()
    }

    #[test]
    fn new_engine_is_idle_with_full_round() {
        let s = Settings::default();
        let engine = TimerEngine::new(&s);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.state().remaining_time, 180);
        assert_eq!(engine.state().current_round, 1);
        assert!(!engine.should_tick());
        assert!(engine.session().is_none());
    }

    #[test]
    fn start_records_session_once() {
        let s = settings(3, 2, 2);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 1_000);
        engine.pause();
        engine.start(&s, 9_000);
        assert_eq!(engine.session().unwrap().started_ms, 1_000);
        assert!(engine.should_tick());
        assert_eq!(engine.phase(), Phase::Round);
    }

    #[test]
    fn pause_is_idempotent() {
        let s = settings(3, 2, 2);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        assert!(engine.pause().is_some());
        assert!(engine.pause().is_none());
        assert!(!engine.state().is_running);
    }

    #[test]
    fn ticks_ignored_while_paused() {
        let s = settings(10, 2, 2);
        let mut engine = TimerEngine::new(&s);
        assert!(engine.tick(&s).is_none());
        assert_eq!(engine.state().remaining_time, 10);
    }

    #[test]
    fn round_end_enters_break_keeping_round() {
        let s = settings(3, 2, 2);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        let events = tick_n(&mut engine, &s, 3);
        assert!(matches!(
            events.as_slice(),
            [Event::BreakStarted { after_round: 1, duration_secs: 2, .. }]
        ));
        assert!(engine.state().is_break);
        assert_eq!(engine.state().remaining_time, 2);
        assert_eq!(engine.state().current_round, 1);
        assert!(facts::FACTS.contains(&engine.state().current_fact.as_str()));
    }

    #[test]
    fn break_end_starts_next_round() {
        let s = settings(3, 2, 2);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        tick_n(&mut engine, &s, 3);
        let events = tick_n(&mut engine, &s, 2);
        assert!(matches!(
            events.as_slice(),
            [Event::RoundStarted { round: 2, duration_secs: 3, .. }]
        ));
        assert!(!engine.state().is_break);
        assert_eq!(engine.state().remaining_time, 3);
        assert_eq!(engine.state().current_round, 2);
    }

    #[test]
    fn final_round_completes() {
        let s = settings(3, 2, 2);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        let events = tick_n(&mut engine, &s, 8);
        assert!(matches!(
            events.last(),
            Some(Event::WorkoutCompleted { completed_rounds: 2, .. })
        ));
        assert!(!engine.state().is_running);
        assert_eq!(engine.state().remaining_time, 0);
        assert_eq!(
            engine.state().status_message.as_deref(),
            Some(COMPLETION_MESSAGE)
        );
        assert_eq!(engine.phase(), Phase::Complete);
        assert!(!engine.should_tick());
        assert!(engine.tick(&s).is_none());
    }

    #[test]
    fn zero_break_passes_in_one_tick() {
        let s = settings(2, 0, 2);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        tick_n(&mut engine, &s, 2);
        assert!(engine.state().is_break);
        assert_eq!(engine.state().remaining_time, 0);
        engine.tick(&s);
        assert!(!engine.state().is_break);
        assert_eq!(engine.state().current_round, 2);
        assert_eq!(engine.state().remaining_time, 2);
    }

    #[test]
    fn one_second_round_finishes_on_first_tick() {
        let s = settings(1, 1, 1);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        assert!(matches!(
            engine.tick(&s),
            Some(Event::WorkoutCompleted { completed_rounds: 1, .. })
        ));
    }

    #[test]
    fn reset_is_idempotent_from_any_state() {
        let s = settings(3, 2, 2);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        tick_n(&mut engine, &s, 4);
        assert!(engine.state().is_break);

        engine.reset(&s);
        let first = engine.state().clone();
        engine.reset(&s);
        let second = engine.state();

        for state in [&first, second] {
            assert!(!state.is_running);
            assert!(!state.is_break);
            assert_eq!(state.current_round, 1);
            assert_eq!(state.remaining_time, 3);
            assert!(state.status_message.is_none());
        }
        assert!(engine.session().is_none());
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn start_after_completion_clears_banner() {
        let s = settings(1, 0, 1);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        engine.tick(&s);
        assert_eq!(engine.phase(), Phase::Complete);
        engine.start(&s, 5_000);
        assert!(engine.state().status_message.is_none());
        assert!(engine.should_tick());
    }

    #[test]
    fn show_round_duration_only_when_idle() {
        let s = settings(180, 60, 3);
        let mut engine = TimerEngine::new(&s);
        assert!(engine.show_round_duration(120));
        assert_eq!(engine.state().remaining_time, 120);

        engine.start(&s, 0);
        assert!(!engine.show_round_duration(60));
        assert_eq!(engine.state().remaining_time, 120);
    }

    #[test]
    fn snapshot_reports_progress() {
        let s = settings(4, 2, 2);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        tick_n(&mut engine, &s, 1);
        match engine.snapshot(&s) {
            Event::StateSnapshot {
                phase,
                remaining_secs,
                total_rounds,
                phase_progress,
                ..
            } => {
                assert_eq!(phase, Phase::Round);
                assert_eq!(remaining_secs, 3);
                assert_eq!(total_rounds, 2);
                assert!((phase_progress - 0.25).abs() < f64::EPSILON);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn round_count_is_fixed_for_the_session() {
        let s = settings(2, 2, 3);
        let lowered = settings(2, 2, 1);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        tick_n(&mut engine, &s, 6);
        assert!(engine.state().is_break);
        assert_eq!(engine.state().current_round, 2);

        let events = tick_n(&mut engine, &lowered, 20);
        assert!(matches!(
            events.last(),
            Some(Event::WorkoutCompleted { completed_rounds: 3, .. })
        ));
        assert_eq!(engine.state().current_round, 3);
        assert!(!engine.state().is_break);
    }

    #[test]
    fn round_limit_also_applies_at_break_end() {
        let s = settings(1, 1, 2);
        let mut engine = TimerEngine::new(&s);
        engine.start(&s, 0);
        engine.tick(&s);
        assert!(engine.state().is_break);
        // a one-round session reaching a break ends there
        engine.session = Some(WorkoutSession {
            started_ms: 0,
            settings: settings(1, 1, 1),
        });
        let event = engine.tick(&s);
        assert!(matches!(
            event,
            Some(Event::WorkoutCompleted { completed_rounds: 1, .. })
        ));
        assert_eq!(engine.state().current_round, 1);
        assert_eq!(engine.phase(), Phase::Complete);
    }

    #[test]
    fn session_elapsed_floors_to_seconds() {
        let session = WorkoutSession {
            started_ms: 1_000,
            settings: Settings::default(),
        };
        assert_eq!(session.elapsed_secs(3_999), 2);
        assert_eq!(session.elapsed_secs(500), 0);
    }
}
