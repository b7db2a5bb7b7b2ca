//! Workout ledger.
//!
//! An ordered, newest-first list of [`WorkoutRecord`]s stored as one JSON
//! array under the `workouts` key and rewritten whole after every change.

mod record;
mod stats;

pub use record::{Difficulty, WorkoutRecord};
pub use stats::LedgerStats;

use tracing::{debug, info, warn};

use crate::storage::{KvStore, WriteBehind, WORKOUTS_KEY};

pub struct WorkoutLedger {
    records: Vec<WorkoutRecord>,
    writer: WriteBehind,
}

impl WorkoutLedger {
    pub fn new(records: Vec<WorkoutRecord>, writer: WriteBehind) -> Self {
        Self { records, writer }
    }

    /// Read the persisted ledger and persist future changes via `writer`.
    pub fn load(store: &dyn KvStore, writer: WriteBehind) -> Self {
        Self::new(Self::read(store), writer)
    }

    /// Read the persisted ledger; empty when absent or unreadable.
    pub fn read(store: &dyn KvStore) -> Vec<WorkoutRecord> {
        match store.get(WORKOUTS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<WorkoutRecord>>(&json) {
                Ok(records) => {
                    info!(count = records.len(), "workout ledger loaded");
                    records
                }
                Err(err) => {
                    warn!("malformed workouts document, starting empty: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("failed to read workouts, starting empty: {err}");
                Vec::new()
            }
        }
    }

    /// Newest first.
    pub fn records(&self) -> &[WorkoutRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&WorkoutRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats::from_records(&self.records)
    }

    /// Insert at the front and persist.
    pub fn append(&mut self, record: WorkoutRecord) {
        info!(
            id = %record.id,
            completed_rounds = record.completed_rounds,
            total_time = record.total_time,
            "workout recorded"
        );
        self.records.insert(0, record);
        self.persist();
    }

    /// Remove the record with `id`. Returns false (and writes nothing) when
    /// no such record exists.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            debug!(id, "delete: no such workout");
            return false;
        }
        self.persist();
        true
    }

    pub fn update_difficulty(&mut self, id: &str, difficulty: Difficulty) -> bool {
        self.modify(id, |r| r.difficulty = Some(difficulty))
    }

    /// Replace the notes; `None` or blank text clears them.
    pub fn update_notes(&mut self, id: &str, notes: Option<String>) -> bool {
        let notes = notes.filter(|n| !n.trim().is_empty());
        self.modify(id, |r| r.notes = notes)
    }

    fn modify<F: FnOnce(&mut WorkoutRecord)>(&mut self, id: &str, f: F) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                f(record);
                self.persist();
                true
            }
            None => {
                debug!(id, "update: no such workout");
                false
            }
        }
    }

    fn persist(&self) {
        match serde_json::to_string(&self.records) {
            Ok(json) => self.writer.write(WORKOUTS_KEY, json),
            Err(err) => warn!("failed to encode workouts: {err}"),
        }
    }
}
