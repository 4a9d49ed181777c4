//! Durable key-addressed document storage.
//!
//! The adapter owns the durable copy of every record: one JSON document per
//! key, plus ring-buffer logs for transaction history. There are no
//! transactions across keys; callers tolerate partial writes (a player
//! update can land while the history append fails independently).
//!
//! Keys follow the `<kind>_<walletAddress>` layout, with two shared
//! documents (`mission_pool`, `marketplace`) not scoped to a wallet.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Storage layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-addressed durable JSON-document storage.
///
/// Last-write-wins at the key level; the adapter provides no cross-process
/// locking.
pub trait StorageAdapter: Send + Sync {
    /// Fetch a document, or `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Overwrite the document at `key`.
    fn put(&self, key: &str, document: &Value) -> Result<(), StorageError>;

    /// Prepend `entry` to the log at `key`, dropping entries beyond
    /// `capacity` (ring-buffer semantics, newest first).
    fn append(&self, key: &str, entry: Value, capacity: usize) -> Result<(), StorageError>;
}

/// Loads and deserializes the document at `key`.
pub fn load<T: DeserializeOwned>(
    storage: &dyn StorageAdapter,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match storage.get(key)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string())),
        None => Ok(None),
    }
}

/// Serializes and stores `value` at `key`.
pub fn save<T: Serialize>(
    storage: &dyn StorageAdapter,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let document =
        serde_json::to_value(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    storage.put(key, &document)
}

/// Well-known storage keys.
pub mod keys {
    /// The durable player aggregate for a wallet.
    pub fn player(wallet: &str) -> String {
        format!("player_{wallet}")
    }

    /// Capped transaction history log for a wallet.
    pub fn history(wallet: &str) -> String {
        format!("history_{wallet}")
    }

    /// Mirror of the remote service's view of a wallet.
    pub fn remote_player(wallet: &str) -> String {
        format!("remote_player_{wallet}")
    }

    /// Game-wide pool of remote mission records.
    pub const MISSION_POOL: &str = "mission_pool";

    /// Shared marketplace listing set.
    pub const MARKETPLACE: &str = "marketplace";
}
