//! File-based StorageAdapter implementation.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{StorageAdapter, StorageError};

/// Stores each document as `{key}.json` under a base directory.
///
/// Writes go through a temp file and an atomic rename so a crash never
/// leaves a half-written document behind.
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn document_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    fn write_atomic(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.document_path(key);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(key, path = %path.display(), "saved document");
        Ok(())
    }
}

impl StorageAdapter for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let value =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(value))
    }

    fn put(&self, key: &str, document: &Value) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(document)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.write_atomic(key, &bytes)
    }

    fn append(&self, key: &str, entry: Value, capacity: usize) -> Result<(), StorageError> {
        let mut entries: Vec<Value> = match self.get(key)? {
            Some(Value::Array(existing)) => existing,
            Some(_) | None => Vec::new(),
        };

        entries.insert(0, entry);
        entries.truncate(capacity);

        let bytes = serde_json::to_vec(&entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.write_atomic(key, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.put("player_abc", &json!({"level": 3})).unwrap();
        let doc = storage.get("player_abc").unwrap().unwrap();
        assert_eq!(doc["level"], 3);
    }

    #[test]
    fn get_absent_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        assert!(storage.get("player_missing").unwrap().is_none());
    }

    #[test]
    fn put_overwrites_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        storage.put("player_abc", &json!({"level": 1})).unwrap();
        storage.put("player_abc", &json!({"level": 2})).unwrap();
        let doc = storage.get("player_abc").unwrap().unwrap();
        assert_eq!(doc["level"], 2);
    }

    #[test]
    fn append_keeps_newest_first_and_caps_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        for i in 0..7 {
            storage.append("history_abc", json!({"seq": i}), 5).unwrap();
        }

        let doc = storage.get("history_abc").unwrap().unwrap();
        let entries = doc.as_array().unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0]["seq"], 6);
        assert_eq!(entries[4]["seq"], 2);
    }
}
