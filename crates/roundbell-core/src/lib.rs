//! # Roundbell Core Library
//!
//! Core logic for Roundbell, a round/break interval timer for boxing-style
//! workouts. Presentation layers (the `roundbell` CLI, or any GUI) sit on top
//! of [`AppState`] and only render its state and forward user commands.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine; the caller delivers one
//!   `tick()` per second while [`AppState::should_tick`] holds
//! - **Settings**: round/break durations, round count and theme, persisted as
//!   one JSON document
//! - **Ledger**: newest-first workout history with on-demand aggregates
//! - **Storage**: a string key-value store (SQLite or in-memory) written from
//!   a background thread, plus TOML runtime configuration
//!
//! ## Key Components
//!
//! - [`AppState`]: facade owning everything below
//! - [`TimerEngine`]: core timer state machine
//! - [`SettingsManager`]: settings document owner
//! - [`WorkoutLedger`]: workout history owner
//! - [`KvStore`]: storage seam

pub mod app;
pub mod clock;
pub mod error;
pub mod events;
pub mod facts;
pub mod ledger;
pub mod settings;
pub mod storage;
pub mod timer;

pub use app::AppState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use ledger::{Difficulty, LedgerStats, WorkoutLedger, WorkoutRecord};
pub use settings::{Settings, SettingsManager, SettingsPatch, Theme};
pub use storage::{AppConfig, KvStore, MemoryStore, SqliteStore, WriteBehind};
pub use timer::{Phase, TimerEngine, TimerState, WorkoutSession};
