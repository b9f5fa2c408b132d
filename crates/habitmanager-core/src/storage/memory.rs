use serde_json::Value;
use std::collections::HashMap;

use super::DocumentStore;
use crate::error::StorageError;

/// In-process document store, for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    docs: HashMap<String, Value>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, as a full disk would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.docs.get(key).cloned())
    }

    fn set_many(&mut self, docs: &[(&str, Value)]) -> Result<(), StorageError> {
        if self.fail_writes {
            let key = docs.first().map(|(k, _)| k.to_string()).unwrap_or_default();
            return Err(StorageError::Write {
                key,
                message: "storage quota exceeded".into(),
            });
        }
        for (key, value) in docs {
            self.docs.insert(key.to_string(), value.clone());
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.docs.remove(key);
        Ok(())
    }
}
