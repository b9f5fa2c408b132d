//! Core error types for habitmanager-core.
//!
//! This module defines the error hierarchy using thiserror. Every error is
//! recoverable: the CLI reports it as a transient message and exits non-zero,
//! nothing here is fatal to the stored data.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitmanager-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Habit completion was refused
    #[error("{0}")]
    Habit(#[from] HabitError),

    /// Storage gateway write or serialization failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Backup document was rejected
    #[error("Import error: {0}")]
    Import(#[from] ImportFormatError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Attachment exceeds the size ceiling
    #[error("File size {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    /// Unknown goal, task or habit id
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a habit completion is refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HabitError {
    #[error("Habit not found: {0}")]
    NotFound(String),

    #[error("Habit already completed today")]
    AlreadyCompleted,

    /// `pending` lists the dependency ids not yet completed for the day.
    #[error("Complete dependent habits first: {}", pending.join(", "))]
    DependencyUnmet { pending: Vec<String> },
}

/// Storage gateway failures (the `WriteError` of the storage contract).
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A document could not be written
    #[error("Failed to write '{key}': {message}")]
    Write { key: String, message: String },

    /// A document could not be read
    #[error("Failed to read '{key}': {message}")]
    Read { key: String, message: String },

    /// A document could not be encoded
    #[error("Failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Backup documents that do not have the export shape.
#[derive(Error, Debug)]
pub enum ImportFormatError {
    #[error("Invalid backup file format: missing '{0}'")]
    MissingField(&'static str),

    #[error("Invalid backup file format: {0}")]
    Malformed(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank
    #[error("'{0}' must not be empty")]
    EmptyField(&'static str),

    /// Dependency references a habit that does not exist
    #[error("Unknown dependency habit: {0}")]
    UnknownDependency(String),

    /// Saving would create a dependency cycle
    #[error("Dependency cycle detected: {}", path.join(" -> "))]
    DependencyCycle { path: Vec<String> },

    /// Mood score outside 1..=5
    #[error("Mood must be between 1 and 5, got {0}")]
    MoodOutOfRange(i64),

    /// Reminder time is not `HH:MM`
    #[error("Invalid reminder time '{0}', expected HH:MM")]
    InvalidReminderTime(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StorageError::Locked
            }
            _ => StorageError::Write {
                key: String::new(),
                message: err.to_string(),
            },
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_error_lists_pending_ids() {
        let err = HabitError::DependencyUnmet {
            pending: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "Complete dependent habits first: a, b");
    }

    #[test]
    fn habit_error_converts_into_core_error() {
        let err: CoreError = HabitError::AlreadyCompleted.into();
        assert!(matches!(err, CoreError::Habit(HabitError::AlreadyCompleted)));
    }

    #[test]
    fn cycle_error_renders_path() {
        let err = ValidationError::DependencyCycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Dependency cycle detected: a -> b -> a");
    }
}
