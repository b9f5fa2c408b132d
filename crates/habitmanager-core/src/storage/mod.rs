mod config;
pub mod database;
mod memory;

pub use config::{
    AttachmentsConfig, Config, HabitsConfig, RemindersConfig, StatsConfig, StreakConfig,
    TimerConfig,
};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use serde_json::Value;
use std::path::PathBuf;

use crate::error::StorageError;

/// Storage gateway: named JSON documents, replaced whole on write.
pub trait DocumentStore {
    /// Read a document. `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Write several documents so that either all or none land.
    fn set_many(&mut self, docs: &[(&str, Value)]) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    fn set(&mut self, key: &str, doc: &Value) -> Result<(), StorageError> {
        self.set_many(&[(key, doc.clone())])
    }
}

/// Returns the data directory, creating it if needed.
///
/// `HABITMANAGER_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/habitmanager[-dev]/`, with `HABITMANAGER_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("HABITMANAGER_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("HABITMANAGER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("habitmanager-dev")
            } else {
                base_dir.join("habitmanager")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
