//! SQLite-backed document storage.
//!
//! Every document lives in one row of the `kv` table as JSON text.
//! Multi-document writes share a transaction.

use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::Path;

use super::{data_dir, DocumentStore};
use crate::error::StorageError;

const DB_FILE: &str = "habitmanager.db";

/// SQLite database holding the JSON documents.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `<data_dir>/habitmanager.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let dir = data_dir().map_err(|e| StorageError::Write {
            key: DB_FILE.to_string(),
            message: e.to_string(),
        })?;
        Self::open_at(&dir.join(DB_FILE))
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )?;
        Ok(())
    }

    /// Get a raw value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a raw value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }
}

fn write_error(key: &str, err: impl std::fmt::Display) -> StorageError {
    StorageError::Write {
        key: key.to_string(),
        message: err.to_string(),
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let raw = self.kv_get(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        raw.map(|text| {
            serde_json::from_str(&text).map_err(|e| StorageError::Read {
                key: key.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
    }

    fn set_many(&mut self, docs: &[(&str, Value)]) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        for (key, value) in docs {
            let text = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
                key: key.to_string(),
                source,
            })?;
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
                params![key, text],
            )
            .map_err(|e| write_error(key, e))?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| write_error(key, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kv_store() {
        let db = SqliteStore::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn documents_round_trip() {
        let mut db = SqliteStore::open_memory().unwrap();
        db.set_many(&[("habits", json!([{"id": "a"}])), ("user", json!({"level": 2}))])
            .unwrap();
        assert_eq!(db.get("user").unwrap().unwrap()["level"], 2);
        db.remove("user").unwrap();
        assert!(db.get("user").unwrap().is_none());
        assert!(db.get("habits").unwrap().is_some());
    }

    #[test]
    fn corrupt_row_is_a_read_error() {
        let db = SqliteStore::open_memory().unwrap();
        db.kv_set("habits", "{not json").unwrap();
        assert!(matches!(db.get("habits"), Err(StorageError::Read { .. })));
    }

    #[test]
    fn file_database_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        {
            let mut db = SqliteStore::open_at(&path).unwrap();
            db.set("moods", &json!([])).unwrap();
        }
        let db = SqliteStore::open_at(&path).unwrap();
        assert_eq!(db.get("moods").unwrap(), Some(json!([])));
    }
}
