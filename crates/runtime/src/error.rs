//! Store-level error types.
//!
//! Only conditions the caller must act on become errors. Soft-fail
//! conditions (updates before initialization, duplicate completions,
//! duplicate removals) are silently ignored by the store, and degraded
//! remote outcomes never surface here at all.

use quest_core::CraftError;

use crate::storage::StorageError;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by store transactions.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A crafting attempt is already in flight; only one at a time.
    #[error("crafting already in progress")]
    CraftingBusy,

    /// `resolve_crafting` was called without a prior `start_crafting`.
    #[error("no crafting attempt in progress")]
    CraftingIdle,

    /// The transaction requires an initialized player.
    #[error("no player loaded")]
    PlayerNotLoaded,

    #[error(transparent)]
    Craft(#[from] CraftError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Bootstrap failed to assemble a usable runtime.
    #[error("configuration error: {0}")]
    Config(String),
}
