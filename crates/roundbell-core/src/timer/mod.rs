mod engine;

pub use engine::{Phase, TimerEngine, TimerState, WorkoutSession, COMPLETION_MESSAGE};
