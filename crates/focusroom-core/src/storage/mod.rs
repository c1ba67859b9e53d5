//! Persistence for the focus session.
//!
//! The session only needs a small key-value store: three JSON blobs under
//! [`SETTINGS_KEY`], [`STATS_KEY`] and [`TASKS_KEY`]. [`Database`] keeps them
//! in SQLite; [`MemoryStore`] keeps them in process for tests and embedding.

mod config;
pub mod database;
mod memory;

pub use config::{Config, HistoryConfig, LoggingConfig, TickerConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;

pub const SETTINGS_KEY: &str = "focus.settings";
pub const STATS_KEY: &str = "focus.stats";
pub const TASKS_KEY: &str = "focus.tasks";

/// Minimal key-value interface the session controller persists through.
pub trait KvStore: Send {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Returns the data directory, creating it if needed.
///
/// `FOCUSROOM_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/focusroom/`, or `~/.config/focusroom-dev/` when
/// `FOCUSROOM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("FOCUSROOM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusroom-dev")
            } else {
                base_dir.join("focusroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
