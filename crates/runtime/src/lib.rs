//! Session runtime: the game state store, progression service, and the
//! persistence layer they write through.
//!
//! Data flows in one direction: UI events call store transactions, each
//! transaction mutates the in-memory session and writes through to durable
//! storage synchronously, then kicks off asynchronous reconciliation with
//! the ledger-backed progression service. Reconciliation results are merged
//! back field-by-field and never overwrite locally owned state.
//!
//! ```text
//! UI ──▶ GameStore ──▶ StorageAdapter (write-through, synchronous)
//!            │
//!            └──▶ ProgressionService ──▶ LedgerTransport (async, coalesced)
//!                        │
//!                        └──▶ StorageAdapter (mock fallback + history log)
//! ```
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod progression;
pub mod storage;
pub mod store;

pub use bootstrap::StoreBuilder;
pub use config::QuestConfig;
pub use error::{Result, StoreError};
pub use progression::{
    HistoryEntry, MissionSpec, ProfilePatch, ProgressionService, RemoteMission, RemotePlayer,
    RemoteProfile, RemoteSnapshot, RemoteTrait, SyncOutcome,
};
pub use storage::{FileStorage, MemoryStorage, StorageAdapter, StorageError, keys};
pub use store::{GameStore, Snapshot};
