//! Whole-store export and import.
//!
//! The backup is one JSON document bundling every collection with an export
//! timestamp and a format version. Import is all-or-nothing: the document is
//! fully validated before anything in the store is replaced.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ImportFormatError;
use crate::model::{Goal, Habit, Mood, Task, User};
use crate::store::EntityStore;

pub const BACKUP_VERSION: &str = "1.0";

/// Top-level fields an import cannot do without.
const REQUIRED_FIELDS: [&str; 5] = ["version", "habits", "goals", "tasks", "user"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub habits: Vec<Habit>,
    pub goals: Vec<Goal>,
    pub tasks: Vec<Task>,
    pub user: User,
    /// Absent in backups from before moods were exported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moods: Option<Vec<Mood>>,
    #[serde(default)]
    pub export_date: Option<DateTime<Utc>>,
    pub version: String,
}

impl Backup {
    pub fn from_store(store: &EntityStore, exported_at: DateTime<Utc>) -> Self {
        Self {
            habits: store.habits.clone(),
            goals: store.goals.clone(),
            tasks: store.tasks.clone(),
            user: store.user.clone(),
            moods: Some(store.moods.clone()),
            export_date: Some(exported_at),
            version: BACKUP_VERSION.to_string(),
        }
    }

    /// Validate a parsed document.
    ///
    /// A required field that is missing or null is `MissingField`; one with
    /// the wrong shape is `Malformed`.
    pub fn from_value(doc: Value) -> Result<Self, ImportFormatError> {
        let obj = doc
            .as_object()
            .ok_or_else(|| ImportFormatError::Malformed("expected a JSON object".into()))?;
        for field in REQUIRED_FIELDS {
            if matches!(obj.get(field), None | Some(Value::Null)) {
                return Err(ImportFormatError::MissingField(field));
            }
        }
        serde_json::from_value(doc).map_err(|e| ImportFormatError::Malformed(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, ImportFormatError> {
        let doc: Value =
            serde_json::from_str(text).map_err(|e| ImportFormatError::Malformed(e.to_string()))?;
        Self::from_value(doc)
    }

    /// Replace the store's collections. Moods are kept unless the backup
    /// carries its own.
    pub fn apply_to(self, store: &mut EntityStore) {
        store.habits = self.habits;
        store.goals = self.goals;
        store.tasks = self.tasks;
        store.user = self.user;
        if let Some(moods) = self.moods {
            store.moods = moods;
        }
        for habit in &mut store.habits {
            habit.dedup_completions();
        }
    }
}

/// Suggested file name for an export made on `date`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("habit-manager-backup-{}.json", date.format("%Y-%m-%d"))
}
