mod config;
pub mod database;
pub mod memory;
pub mod writer;

pub use config::AppConfig;
pub use database::SqliteStore;
pub use memory::MemoryStore;
pub use writer::WriteBehind;

use std::path::PathBuf;

use crate::error::{ConfigError, StorageError};

/// Key of the persisted settings document.
pub const SETTINGS_KEY: &str = "settings";
/// Key of the persisted workout ledger document.
pub const WORKOUTS_KEY: &str = "workouts";

/// Durable string key-value storage.
///
/// Both documents are stored whole; there are no partial writes.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Returns the roundbell data directory, creating it if needed.
///
/// `ROUNDBELL_HOME` wins when set. Otherwise `~/.config/roundbell`, or
/// `~/.config/roundbell-dev` with `ROUNDBELL_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("ROUNDBELL_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ROUNDBELL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("roundbell-dev")
            } else {
                base_dir.join("roundbell")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
