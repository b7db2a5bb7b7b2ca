pub mod config;
pub mod run;
pub mod settings;
pub mod status;
pub mod workouts;
