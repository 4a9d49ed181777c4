//! Assembles storage, progression, and the store into a running setup.

use std::sync::Arc;

use ledger_core::LedgerTransport;
use tracing::info;

use crate::config::QuestConfig;
use crate::error::Result;
use crate::progression::ProgressionService;
use crate::storage::{FileStorage, MemoryStorage, StorageAdapter};
use crate::store::GameStore;

/// Builder that wires the persistence adapter, the progression service, and
/// the game store together.
///
/// Without a transport the store runs fully local; every ledger write
/// degrades to a mock record. Without explicit storage the builder uses
/// file-backed storage under the configured data directory.
pub struct StoreBuilder {
    config: QuestConfig,
    storage: Option<Arc<dyn StorageAdapter>>,
    transport: Option<Arc<dyn LedgerTransport>>,
}

impl StoreBuilder {
    pub fn new(config: QuestConfig) -> Self {
        Self {
            config,
            storage: None,
            transport: None,
        }
    }

    pub fn from_env() -> Self {
        Self::new(QuestConfig::from_env())
    }

    /// Provide a ledger transport (e.g. a real chain client or a mock).
    pub fn transport(mut self, transport: impl LedgerTransport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Provide a custom storage adapter.
    pub fn storage(mut self, storage: impl StorageAdapter + 'static) -> Self {
        self.storage = Some(Arc::new(storage));
        self
    }

    /// Use in-memory storage, discarding everything on drop.
    pub fn in_memory(mut self) -> Self {
        self.storage = Some(Arc::new(MemoryStorage::new()));
        self
    }

    pub fn build(self) -> Result<GameStore> {
        let storage: Arc<dyn StorageAdapter> = match self.storage {
            Some(storage) => storage,
            None => {
                let data_dir = self.config.resolve_data_dir()?;
                info!(data_dir = %data_dir.display(), "using file-backed storage");
                Arc::new(FileStorage::new(&data_dir)?)
            }
        };

        let progression = match self.transport {
            Some(transport) => {
                ProgressionService::with_transport(Arc::clone(&storage), transport)
            }
            None => {
                info!("no ledger transport configured; running local-only");
                ProgressionService::new(Arc::clone(&storage))
            }
        }
        .history_capacity(self.config.history_capacity);

        Ok(GameStore::with_notification_capacity(
            Arc::new(progression),
            storage,
            self.config.notification_capacity,
        ))
    }
}
