//! In-memory StorageAdapter for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::{StorageAdapter, StorageError};

/// HashMap-backed storage with the same semantics as [`super::FileStorage`].
#[derive(Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.documents.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, document: &Value) -> Result<(), StorageError> {
        self.documents
            .lock()
            .unwrap()
            .insert(key.to_string(), document.clone());
        Ok(())
    }

    fn append(&self, key: &str, entry: Value, capacity: usize) -> Result<(), StorageError> {
        let mut documents = self.documents.lock().unwrap();
        let mut entries = match documents.remove(key) {
            Some(Value::Array(existing)) => existing,
            _ => Vec::new(),
        };

        entries.insert(0, entry);
        entries.truncate(capacity);
        documents.insert(key.to_string(), Value::Array(entries));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn append_ring_buffer_matches_file_semantics() {
        let storage = MemoryStorage::new();
        for i in 0..4 {
            storage.append("log", json!(i), 3).unwrap();
        }

        let doc = storage.get("log").unwrap().unwrap();
        assert_eq!(doc, json!([3, 2, 1]));
    }
}
