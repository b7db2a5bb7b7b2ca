//! Application facade.
//!
//! [`AppState`] owns the settings manager, timer engine and workout ledger
//! and is the only thing a presentation layer talks to. Every command is
//! applied to memory synchronously; the affected document is then queued on
//! the write-behind worker.

use std::sync::Arc;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::Result;
use crate::events::Event;
use crate::ledger::{Difficulty, LedgerStats, WorkoutLedger, WorkoutRecord};
use crate::settings::{Settings, SettingsManager, SettingsPatch};
use crate::storage::{KvStore, WriteBehind};
use crate::timer::{Phase, TimerEngine, TimerState};

pub struct AppState {
    clock: Arc<dyn Clock>,
    settings: SettingsManager,
    engine: TimerEngine,
    ledger: WorkoutLedger,
    writer: WriteBehind,
}

impl AppState {
    /// Load both documents from `store`, then hand the store to a
    /// background writer.
    ///
    /// # Errors
    /// Returns an error if the writer thread cannot be started.
    pub fn open<S: KvStore + 'static>(store: S, clock: Arc<dyn Clock>) -> Result<Self> {
        let loaded_settings = SettingsManager::read(&store);
        let loaded_records = WorkoutLedger::read(&store);
        let writer = WriteBehind::spawn(store)?;
        let settings = SettingsManager::new(loaded_settings, writer.clone());
        let ledger = WorkoutLedger::new(loaded_records, writer.clone());

        let engine = TimerEngine::new(settings.get());
        debug!(
            remaining = engine.state().remaining_time,
            workouts = ledger.len(),
            "app state opened"
        );

        Ok(Self {
            clock,
            settings,
            engine,
            ledger,
            writer,
        })
    }

    // ── Read-only views ──────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        self.settings.get()
    }

    pub fn timer(&self) -> &TimerState {
        self.engine.state()
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    /// Whether the presentation layer should keep its tick source running.
    pub fn should_tick(&self) -> bool {
        self.engine.should_tick()
    }

    pub fn workouts(&self) -> &[WorkoutRecord] {
        self.ledger.records()
    }

    pub fn stats(&self) -> LedgerStats {
        self.ledger.stats()
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(self.settings.get())
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) -> Event {
        let now = self.clock.now_ms();
        self.engine.start(self.settings.get(), now)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.engine.pause()
    }

    pub fn reset(&mut self) -> Event {
        self.engine.reset(self.settings.get())
    }

    /// Deliver one tick. A natural completion records the workout before
    /// the completion event is returned.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick(self.settings.get())?;
        if let Event::WorkoutCompleted {
            completed_rounds, ..
        } = &event
        {
            self.save_workout(None, None, Some(*completed_rounds));
        }
        Some(event)
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Merge and persist `patch`. When idle, the displayed countdown follows
    /// the new round duration; an in-flight countdown is left alone.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> &Settings {
        let round_duration = self.settings.update(patch).round_duration;
        if self.engine.show_round_duration(round_duration) {
            debug!(round_duration, "idle display refreshed");
        }
        self.settings.get()
    }

    // ── Ledger ───────────────────────────────────────────────────────

    /// Record the current session. Without an active session this is a
    /// silent no-op returning `None`.
    ///
    /// `completed_rounds` defaults to the current round and is capped at the
    /// session's round count.
    pub fn save_workout(
        &mut self,
        difficulty: Option<Difficulty>,
        notes: Option<String>,
        completed_rounds: Option<u32>,
    ) -> Option<&WorkoutRecord> {
        let session = self.engine.take_session()?;
        let now = self.clock.now_ms();
        let snapshot = &session.settings;
        let completed = completed_rounds
            .unwrap_or(self.engine.state().current_round)
            .min(snapshot.rounds);

        let record = WorkoutRecord {
            id: WorkoutRecord::new_id(),
            date: now,
            round_duration: snapshot.round_duration,
            break_duration: snapshot.break_duration,
            total_rounds: snapshot.rounds,
            completed_rounds: completed,
            total_time: session.elapsed_secs(now),
            difficulty,
            notes: notes.filter(|n| !n.trim().is_empty()),
        };
        info!(id = %record.id, completed, total = snapshot.rounds, "saving workout");
        self.ledger.append(record);
        self.ledger.records().first()
    }

    pub fn delete_workout(&mut self, id: &str) -> bool {
        self.ledger.delete(id)
    }

    pub fn update_workout_difficulty(&mut self, id: &str, difficulty: Difficulty) -> bool {
        self.ledger.update_difficulty(id, difficulty)
    }

    pub fn update_workout_notes(&mut self, id: &str, notes: Option<String>) -> bool {
        self.ledger.update_notes(id, notes)
    }

    /// Block until every queued document write has reached the store.
    pub fn flush(&self) {
        self.writer.flush();
    }
}
