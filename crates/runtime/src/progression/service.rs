//! The progression service implementation.

use std::sync::Arc;

use chrono::Utc;
use ledger_core::{DegradedReason, LedgerTransport, TxIntent, TxStatus};
use tracing::{debug, warn};

use quest_core::generate_id;

use crate::storage::{self, StorageAdapter, keys};

use super::types::{
    HistoryEntry, MissionSpec, ProfilePatch, RemoteMission, RemotePlayer, RemoteProfile,
    RemoteSnapshot, SyncOutcome,
};

/// Default capacity of the per-wallet transaction history log.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Higher-level progression operations over the ledger gateway.
///
/// Holds the transport as an explicit dependency; constructing the service
/// without one puts every operation on the degraded local path, which is a
/// fully supported mode, not an error.
pub struct ProgressionService {
    transport: Option<Arc<dyn LedgerTransport>>,
    storage: Arc<dyn StorageAdapter>,
    history_capacity: usize,
}

impl ProgressionService {
    /// Local-only service: every write degrades to the mock path.
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            transport: None,
            storage,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Service backed by a real ledger transport.
    pub fn with_transport(
        storage: Arc<dyn StorageAdapter>,
        transport: Arc<dyn LedgerTransport>,
    ) -> Self {
        Self {
            transport: Some(transport),
            storage,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }

    /// Pushes the player's progression fields to the remote and mirrors the
    /// result into the durable remote-player document.
    pub async fn update_player(&self, wallet: &str, patch: ProfilePatch) -> SyncOutcome {
        let intent = TxIntent::UpdateProfile {
            wallet: wallet.to_string(),
            level: patch.level,
            experience: patch.experience,
            reputation: patch.reputation,
        };
        let outcome = self.submit(wallet, intent).await;

        let mut mirror = self.load_mirror(wallet);
        mirror.level = patch.level;
        mirror.experience = patch.experience;
        mirror.reputation = patch.reputation;
        mirror.last_active = outcome.timestamp;
        if let Some(signature) = outcome.status.signature() {
            mirror.last_signature = Some(signature.as_str().to_string());
        }
        self.store_mirror(wallet, &mirror);

        outcome
    }

    /// Creates the remote user + profile pair for a fresh wallet.
    pub async fn create_user_profile(&self, wallet: &str) -> RemoteProfile {
        let user = self
            .submit(
                wallet,
                TxIntent::CreateUser {
                    wallet: wallet.to_string(),
                    name: format!("Player {}", wallet.chars().take(6).collect::<String>()),
                },
            )
            .await;
        let profile = self
            .submit(wallet, TxIntent::CreateProfile { wallet: wallet.to_string() })
            .await;

        // Make sure a mirror document exists so later syncs have something
        // to read even on the fully degraded path.
        let mirror = self.load_mirror(wallet);
        self.store_mirror(wallet, &mirror);

        RemoteProfile {
            user_address: format!("user_{wallet}"),
            profile_address: mirror.id,
            signatures: [&user, &profile]
                .iter()
                .filter_map(|o| o.status.signature())
                .map(|s| s.as_str().to_string())
                .collect(),
        }
    }

    /// Creates a remote mission record and appends it to the shared pool.
    pub async fn create_mission(&self, wallet: &str, spec: MissionSpec) -> RemoteMission {
        let intent = TxIntent::CreateMission {
            title: spec.title.clone(),
            description: spec.description.clone(),
            mission_type: spec.mission_type.clone(),
            reward_experience: spec.reward_experience,
        };
        let outcome = self.submit(wallet, intent).await;

        let mission = RemoteMission {
            id: match outcome.status.signature() {
                Some(signature) => format!("mission_{signature}"),
                None => format!("local_mission_{}", generate_id()),
            },
            title: spec.title,
            mission_type: spec.mission_type,
            reward_experience: spec.reward_experience,
            completed: false,
        };

        let mut pool: Vec<RemoteMission> = self.load_or_default(keys::MISSION_POOL);
        pool.push(mission.clone());
        if let Err(err) = storage::save(&*self.storage, keys::MISSION_POOL, &pool) {
            warn!(%err, "failed to persist mission pool");
        }

        mission
    }

    /// Records that the wallet started a mission.
    pub async fn start_mission(&self, wallet: &str, mission_id: &str) -> SyncOutcome {
        self.submit(
            wallet,
            TxIntent::StartMission {
                wallet: wallet.to_string(),
                mission_id: mission_id.to_string(),
            },
        )
        .await
    }

    /// Read-side fetch of the remote view of a wallet.
    pub async fn get_player(&self, wallet: &str) -> Option<RemotePlayer> {
        match storage::load(&*self.storage, &keys::remote_player(wallet)) {
            Ok(player) => player,
            Err(err) => {
                warn!(%err, wallet, "failed to read remote player mirror");
                None
            }
        }
    }

    /// Assembles the reconciliation snapshot: the remote player mirror plus
    /// the shared mission pool. Returns `None` when the wallet has no remote
    /// record yet.
    pub async fn sync_player_data(&self, wallet: &str) -> Option<RemoteSnapshot> {
        let mirror = self.get_player(wallet).await?;
        let missions: Vec<RemoteMission> = self.load_or_default(keys::MISSION_POOL);

        let outcome = self
            .submit(wallet, TxIntent::SyncProfile { wallet: wallet.to_string() })
            .await;

        Some(RemoteSnapshot {
            player_id: mirror.id,
            reputation: mirror.reputation,
            traits: mirror.traits,
            missions,
            last_sync: outcome.timestamp,
        })
    }

    /// The capped reconciliation history for a wallet, newest first.
    pub async fn history(&self, wallet: &str) -> Vec<HistoryEntry> {
        match storage::load(&*self.storage, &keys::history(wallet)) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(err) => {
                warn!(%err, wallet, "failed to read transaction history");
                Vec::new()
            }
        }
    }

    /// Single submission path: classify, degrade, record history.
    async fn submit(&self, wallet: &str, intent: TxIntent) -> SyncOutcome {
        let status = match &self.transport {
            None => {
                debug!(kind = intent.kind(), "no ledger configured; using local record");
                TxStatus::Degraded {
                    reason: DegradedReason::NoRemote,
                }
            }
            Some(transport) => match transport.submit(intent.clone()).await {
                Ok(signature) => TxStatus::Confirmed { signature },
                Err(err) => {
                    warn!(
                        %err,
                        kind = intent.kind(),
                        "ledger write failed; falling back to local record"
                    );
                    TxStatus::Degraded {
                        reason: err.classify(),
                    }
                }
            },
        };

        let id = match status.signature() {
            Some(signature) => signature.as_str().to_string(),
            None => format!("local_tx_{}", generate_id()),
        };

        let outcome = SyncOutcome {
            id,
            status,
            intent,
            timestamp: Utc::now(),
        };
        self.record_history(wallet, &outcome);
        outcome
    }

    fn record_history(&self, wallet: &str, outcome: &SyncOutcome) {
        let entry = HistoryEntry {
            id: outcome.id.clone(),
            kind: outcome.intent.kind().to_string(),
            status: outcome.status.label(),
            payload: serde_json::to_value(&outcome.intent).unwrap_or_default(),
            timestamp: outcome.timestamp,
        };

        let entry = match serde_json::to_value(&entry) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "failed to encode history entry");
                return;
            }
        };

        // History is best-effort; a failed append never blocks the write.
        if let Err(err) = self
            .storage
            .append(&keys::history(wallet), entry, self.history_capacity)
        {
            warn!(%err, wallet, "failed to append transaction history");
        }
    }

    fn load_mirror(&self, wallet: &str) -> RemotePlayer {
        match storage::load(&*self.storage, &keys::remote_player(wallet)) {
            Ok(Some(mirror)) => mirror,
            Ok(None) => RemotePlayer::new(wallet),
            Err(err) => {
                warn!(%err, wallet, "failed to read remote player mirror; recreating");
                RemotePlayer::new(wallet)
            }
        }
    }

    fn store_mirror(&self, wallet: &str, mirror: &RemotePlayer) {
        if let Err(err) = storage::save(&*self.storage, &keys::remote_player(wallet), mirror) {
            warn!(%err, wallet, "failed to persist remote player mirror");
        }
    }

    fn load_or_default<T: Default + serde::de::DeserializeOwned>(&self, key: &str) -> T {
        match storage::load(&*self.storage, key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(err) => {
                warn!(%err, key, "failed to read document; using default");
                T::default()
            }
        }
    }
}
