use clap::Subcommand;
use roundbell_core::{AppConfig, Difficulty};

use crate::common::{describe, format_duration, open_app};

#[derive(Subcommand)]
pub enum WorkoutsAction {
    /// List recorded workouts, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a workout
    Delete {
        /// Workout ID
        id: String,
    },
    /// Rate how hard a workout felt
    Difficulty {
        /// Workout ID
        id: String,
        /// easy, medium or hard
        level: Difficulty,
    },
    /// Attach notes to a workout; an empty string clears them
    Notes {
        /// Workout ID
        id: String,
        /// Note text
        text: String,
    },
    /// Aggregate statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: WorkoutsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let mut app = open_app(&config)?;

    match action {
        WorkoutsAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(app.workouts())?);
            } else if app.workouts().is_empty() {
                println!("No workouts yet.");
            } else {
                for record in app.workouts() {
                    println!("{}", describe(record));
                }
            }
        }
        WorkoutsAction::Delete { id } => {
            if !app.delete_workout(&id) {
                return Err(format!("workout not found: {id}").into());
            }
            println!("deleted {id}");
        }
        WorkoutsAction::Difficulty { id, level } => {
            if !app.update_workout_difficulty(&id, level) {
                return Err(format!("workout not found: {id}").into());
            }
            println!("{id}: {level}");
        }
        WorkoutsAction::Notes { id, text } => {
            if !app.update_workout_notes(&id, Some(text)) {
                return Err(format!("workout not found: {id}").into());
            }
            println!("ok");
        }
        WorkoutsAction::Stats { json } => {
            let stats = app.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Workouts:      {}", stats.total_workouts);
                println!("Rounds:        {}", stats.total_rounds);
                println!("Total time:    {}", format_duration(stats.total_time_secs));
                println!("Avg rounds:    {:.1}", stats.average_rounds);
            }
        }
    }

    app.flush();
    Ok(())
}
