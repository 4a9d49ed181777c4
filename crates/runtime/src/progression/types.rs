//! Result and mirror-record types for the progression service.

use chrono::{DateTime, Utc};
use ledger_core::{TxIntent, TxStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use quest_core::TraitKind;

/// Uniform result of one progression operation.
///
/// `id` is the real transaction signature when confirmed, or a synthetic
/// local identifier when degraded; `status` tells the two apart but the
/// shape never changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub id: String,
    #[serde(flatten)]
    pub status: TxStatus,
    pub intent: TxIntent,
    pub timestamp: DateTime<Utc>,
}

/// Player progression fields pushed to the remote on reconciliation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub level: u32,
    pub experience: u64,
    pub reputation: i64,
}

/// Request to create a remote mission record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionSpec {
    pub title: String,
    pub description: String,
    pub mission_type: String,
    pub reward_experience: u64,
}

/// One entry in the capped per-wallet transaction history log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub kind: String,
    pub status: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

/// Remote mission record (real or locally mocked).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteMission {
    pub id: String,
    pub title: String,
    pub mission_type: String,
    pub reward_experience: u64,
    pub completed: bool,
}

/// Remote trait record carried in sync responses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteTrait {
    pub id: String,
    pub kind: TraitKind,
    pub level: u32,
}

/// Durable mirror of the remote service's view of one wallet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemotePlayer {
    pub id: String,
    pub wallet_address: String,
    pub level: u32,
    pub experience: u64,
    pub reputation: i64,
    pub traits: Vec<RemoteTrait>,
    pub last_signature: Option<String>,
    pub last_active: DateTime<Utc>,
}

impl RemotePlayer {
    pub fn new(wallet: &str) -> Self {
        Self {
            id: format!("profile_{wallet}"),
            wallet_address: wallet.to_string(),
            level: 1,
            experience: 0,
            reputation: 0,
            traits: Vec::new(),
            last_signature: None,
            last_active: Utc::now(),
        }
    }
}

/// Result of profile creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteProfile {
    pub user_address: String,
    pub profile_address: String,
    /// Signatures of the confirmed creation transactions, if any.
    pub signatures: Vec<String>,
}

/// Read-side snapshot used by reconciliation merges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteSnapshot {
    pub player_id: String,
    pub reputation: i64,
    pub traits: Vec<RemoteTrait>,
    pub missions: Vec<RemoteMission>,
    pub last_sync: DateTime<Utc>,
}
