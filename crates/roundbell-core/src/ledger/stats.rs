//! Aggregates over the workout ledger, computed on demand.

use serde::{Deserialize, Serialize};

use super::WorkoutRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_workouts: usize,
    pub total_rounds: u64,
    pub total_time_secs: u64,
    /// Mean completed rounds, one decimal; 0.0 for an empty ledger.
    pub average_rounds: f64,
}

impl LedgerStats {
    pub fn from_records(records: &[WorkoutRecord]) -> Self {
        let total_workouts = records.len();
        let total_rounds: u64 = records.iter().map(|r| r.completed_rounds as u64).sum();
        let total_time_secs: u64 = records.iter().map(|r| r.total_time).sum();
        let average_rounds = if total_workouts == 0 {
            0.0
        } else {
            (total_rounds as f64 / total_workouts as f64 * 10.0).round() / 10.0
        };

        Self {
            total_workouts,
            total_rounds,
            total_time_secs,
            average_rounds,
        }
    }

    pub fn total_minutes(&self) -> u64 {
        self.total_time_secs / 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(completed_rounds: u32, total_time: u64) -> WorkoutRecord {
        WorkoutRecord {
            id: WorkoutRecord::new_id(),
            date: 0,
            round_duration: 60,
            break_duration: 30,
            total_rounds: 5,
            completed_rounds,
            total_time,
            difficulty: None,
            notes: None,
        }
    }

    #[test]
    fn empty_ledger_is_all_zero() {
        let stats = LedgerStats::from_records(&[]);
        assert_eq!(stats.total_workouts, 0);
        assert_eq!(stats.total_rounds, 0);
        assert_eq!(stats.total_time_secs, 0);
        assert_eq!(stats.average_rounds, 0.0);
        assert!(!stats.average_rounds.is_nan());
    }

    #[test]
    fn sums_and_rounds_average_to_one_decimal() {
        let stats = LedgerStats::from_records(&[record(3, 600), record(2, 400), record(2, 125)]);
        assert_eq!(stats.total_workouts, 3);
        assert_eq!(stats.total_rounds, 7);
        assert_eq!(stats.total_time_secs, 1125);
        assert_eq!(stats.average_rounds, 2.3);
        assert_eq!(stats.total_minutes(), 18);
    }
}
