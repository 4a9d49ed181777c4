//! Runtime configuration structures and loaders.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Configuration required to bootstrap a game store.
#[derive(Clone, Debug)]
pub struct QuestConfig {
    /// Directory for durable documents. `None` resolves to the
    /// platform-specific data directory.
    pub data_dir: Option<PathBuf>,
    /// Cap on the per-wallet transaction history log.
    pub history_capacity: usize,
    /// Cap on the client-visible notification feed.
    pub notification_capacity: usize,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            history_capacity: crate::progression::DEFAULT_HISTORY_CAPACITY,
            notification_capacity: crate::store::DEFAULT_NOTIFICATION_CAPACITY,
        }
    }
}

impl QuestConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `QUEST_DATA_DIR` - Directory for save data (default: platform-specific)
    /// - `QUEST_HISTORY_CAPACITY` - Transaction history cap (default: 50)
    /// - `QUEST_NOTIFICATION_CAPACITY` - Notification feed cap (default: 50)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.data_dir = env::var("QUEST_DATA_DIR").ok().map(PathBuf::from);

        if let Some(capacity) = read_env::<usize>("QUEST_HISTORY_CAPACITY") {
            config.history_capacity = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("QUEST_NOTIFICATION_CAPACITY") {
            config.notification_capacity = capacity.max(1);
        }

        config
    }

    /// The directory file-backed storage should write to.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        directories::ProjectDirs::from("", "", "honeycomb-quest")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                StoreError::Config("no data directory available on this platform".into())
            })
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
