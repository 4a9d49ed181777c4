//! Progression service: ledger writes with transparent local fallback.
//!
//! Every operation attempts the remote write when a transport is configured,
//! classifies any failure, and degrades to a locally persisted mock record.
//! The caller-visible result shape never changes, so the store treats the
//! remote and local paths identically. No operation is retried and no error
//! escapes this layer.

mod service;
mod types;

pub use service::{DEFAULT_HISTORY_CAPACITY, ProgressionService};
pub use types::{
    HistoryEntry, MissionSpec, ProfilePatch, RemoteMission, RemotePlayer, RemoteProfile,
    RemoteSnapshot, RemoteTrait, SyncOutcome,
};
