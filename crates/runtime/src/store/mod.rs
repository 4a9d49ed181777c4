//! The game state store: atomic transactions over the active session.
//!
//! The store is the single writer for the in-memory player aggregate. Every
//! transaction runs its in-memory mutation and durable write synchronously,
//! publishes a fresh [`Snapshot`] to subscribers, and (where relevant) kicks
//! off asynchronous reconciliation with the progression service.
//!
//! Reconciliation is coalesced: at most one push is in flight per store, and
//! transactions arriving meanwhile just mark it dirty, superseding rather
//! than queueing. Reconciliation tasks are spawned onto the ambient Tokio
//! runtime; constructing transactions outside one panics, which is treated
//! as a wiring bug rather than a runtime condition.

mod reconcile;
mod session;
mod snapshot;

pub use reconcile::merge_remote;
pub use snapshot::Snapshot;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use rand::Rng;
use tokio::sync::watch;
use tracing::{debug, error, warn};

use quest_core::{
    Artifact, CraftOutcome, ElementType, MAX_ELEMENTS, Mission, Notification, NotificationKind,
    Player, PlayerUpdate, attempt_craft,
};

use crate::error::{Result, StoreError};
use crate::progression::{MissionSpec, ProfilePatch, ProgressionService};
use crate::storage::{self, StorageAdapter, keys};

use session::Session;

/// Default cap on the client-visible notification feed.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 50;

/// What a spawned remote-mission record should be correlated back onto.
enum RemoteRecordTarget {
    Artifact(String),
    Mission(String),
}

/// Authoritative in-memory state for the active session.
pub struct GameStore {
    state: Arc<Mutex<Session>>,
    storage: Arc<dyn StorageAdapter>,
    progression: Arc<ProgressionService>,
    snapshot_tx: watch::Sender<Snapshot>,
    sync_dirty: Arc<AtomicBool>,
    sync_running: Arc<AtomicBool>,
}

impl GameStore {
    pub fn new(progression: Arc<ProgressionService>, storage: Arc<dyn StorageAdapter>) -> Self {
        Self::with_notification_capacity(progression, storage, DEFAULT_NOTIFICATION_CAPACITY)
    }

    pub fn with_notification_capacity(
        progression: Arc<ProgressionService>,
        storage: Arc<dyn StorageAdapter>,
        notification_capacity: usize,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::default());
        Self {
            state: Arc::new(Mutex::new(Session::new(notification_capacity))),
            storage,
            progression,
            snapshot_tx,
            sync_dirty: Arc::new(AtomicBool::new(false)),
            sync_running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to state snapshots; one is published after every
    /// transaction.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Loads or creates the player for `wallet`.
    ///
    /// Idempotent: a second call with a player already loaded is a no-op.
    /// Fresh players receive the fixed starter traits and one starter
    /// mission. Reconciliation (and, for fresh players, remote profile
    /// creation) is fired asynchronously; its failures are logged, never
    /// returned.
    pub fn initialize_player(&self, wallet: &str) -> Result<()> {
        let fresh;
        {
            let mut session = self.lock();
            if session.player.is_some() {
                debug!(wallet, "player already initialized; ignoring");
                return Ok(());
            }

            let existing: Option<Player> = storage::load(&*self.storage, &keys::player(wallet))?;
            fresh = existing.is_none();

            let player = existing.unwrap_or_else(|| {
                let mut player = Player::new(wallet);
                player.missions.push(Mission::starter());
                player
            });

            session.player = Some(player);
            session.current_mission_id = session.next_incomplete_mission();
            session.marketplace = self.load_marketplace();

            self.persist_player(&mut session);
            self.publish(&session);
        }

        if fresh {
            let progression = Arc::clone(&self.progression);
            let wallet = wallet.to_string();
            tokio::spawn(async move {
                let profile = progression.create_user_profile(&wallet).await;
                debug!(%wallet, profile = %profile.profile_address, "remote profile ensured");
            });
        }
        self.schedule_reconcile();
        Ok(())
    }

    /// Merges a partial update into the player.
    ///
    /// Soft no-op when no player is loaded: the UI may dispatch updates
    /// before initialization completes, and that is not an error.
    pub fn update_player(&self, update: PlayerUpdate) {
        {
            let mut session = self.lock();
            let Some(player) = session.player.as_mut() else {
                debug!("update_player before initialization; ignoring");
                return;
            };
            player.apply_update(&update);
            self.persist_player(&mut session);
            self.publish(&session);
        }
        self.schedule_reconcile();
    }

    /// Adds an artifact to the player's inventory.
    pub fn add_item(&self, artifact: Artifact) {
        let mut session = self.lock();
        let Some(player) = session.player.as_mut() else {
            debug!("add_item before initialization; ignoring");
            return;
        };
        if player.artifacts.iter().any(|a| a.id == artifact.id) {
            debug!(artifact = %artifact.id, "duplicate artifact id; ignoring");
            return;
        }
        player.artifacts.push(artifact);
        self.persist_player(&mut session);
        self.publish(&session);
    }

    /// Removes an artifact by id. Idempotent: unknown ids are ignored.
    pub fn remove_item(&self, artifact_id: &str) {
        let mut session = self.lock();
        let Some(player) = session.player.as_mut() else {
            return;
        };
        let before = player.artifacts.len();
        player.artifacts.retain(|a| a.id != artifact_id);
        if player.artifacts.len() == before {
            debug!(artifact_id, "remove_item on unknown id; ignoring");
            return;
        }
        self.persist_player(&mut session);
        self.publish(&session);
    }

    /// Grants experience, applying at most one level-up per call.
    pub fn add_experience(&self, amount: u64) {
        {
            let mut session = self.lock();
            if session.player.is_none() {
                debug!("add_experience before initialization; ignoring");
                return;
            }
            session.apply_experience(amount);
            self.persist_player(&mut session);
            self.publish(&session);
        }
        self.schedule_reconcile();
    }

    /// Completes a mission and grants its rewards exactly once.
    ///
    /// Soft no-op for unknown or already-completed missions. Emits one
    /// asynchronous remote record-keeping call on completion.
    pub fn complete_mission(&self, mission_id: &str) {
        let record;
        {
            let mut session = self.lock();
            let Some(spec) = session.complete_mission(mission_id) else {
                debug!(mission_id, "mission missing or already completed; ignoring");
                return;
            };
            record = spec;
            self.persist_player(&mut session);
            self.publish(&session);
        }

        self.spawn_remote_record(record, RemoteRecordTarget::Mission(mission_id.to_string()));
        self.schedule_reconcile();
    }

    /// Adds an element to the crafting selection (up to four slots,
    /// duplicates allowed).
    pub fn select_element(&self, element: ElementType) {
        let mut session = self.lock();
        if session.selected_elements.len() >= MAX_ELEMENTS {
            debug!(%element, "element slots full; ignoring");
            return;
        }
        session.selected_elements.push(element);
        self.publish(&session);
    }

    /// Removes one occurrence of an element from the selection.
    pub fn deselect_element(&self, element: ElementType) {
        let mut session = self.lock();
        if let Some(pos) = session.selected_elements.iter().position(|e| *e == element) {
            session.selected_elements.remove(pos);
            self.publish(&session);
        }
    }

    pub fn clear_selected_elements(&self) {
        let mut session = self.lock();
        session.selected_elements.clear();
        self.publish(&session);
    }

    /// Begins a crafting attempt.
    ///
    /// Rejects re-entry while an attempt is in flight and empty selections;
    /// both are caller-visible signals, not soft-fails.
    pub fn start_crafting(&self) -> Result<()> {
        let mut session = self.lock();
        if session.crafting_in_progress {
            return Err(StoreError::CraftingBusy);
        }
        if session.player.is_none() {
            return Err(StoreError::PlayerNotLoaded);
        }
        if session.selected_elements.is_empty() {
            return Err(quest_core::CraftError::EmptySelection.into());
        }
        session.crafting_in_progress = true;
        self.publish(&session);
        Ok(())
    }

    /// Runs the crafting engine against the current selection and applies
    /// the outcome via [`Self::complete_crafting`].
    pub fn resolve_crafting<R: Rng>(&self, rng: &mut R) -> Result<CraftOutcome> {
        let (owner, elements, traits) = {
            let session = self.lock();
            if !session.crafting_in_progress {
                return Err(StoreError::CraftingIdle);
            }
            let player = session.player.as_ref().ok_or(StoreError::PlayerNotLoaded)?;
            (
                player.wallet_address.clone(),
                session.selected_elements.clone(),
                player.traits.clone(),
            )
        };

        let outcome = attempt_craft(&owner, &elements, &traits, rng)?;
        match &outcome {
            CraftOutcome::Success(artifact) => self.complete_crafting(true, Some(artifact.clone())),
            CraftOutcome::Failure { .. } => self.complete_crafting(false, None),
        }
        Ok(outcome)
    }

    /// Applies a crafting outcome.
    ///
    /// Always clears the in-progress flag and always emits a notification.
    /// On success the artifact joins the inventory, the current mission
    /// advances, and a remote record is created asynchronously, its id
    /// merged back onto the artifact once settled.
    pub fn complete_crafting(&self, success: bool, artifact: Option<Artifact>) {
        let mut records: Vec<(MissionSpec, RemoteRecordTarget)> = Vec::new();
        {
            let mut session = self.lock();
            session.crafting_in_progress = false;

            if success {
                let name = artifact
                    .as_ref()
                    .map_or_else(|| "an artifact".to_string(), |a| a.name.clone());

                // Inventory and mission side effects need a loaded player;
                // without one the outcome is notification-only.
                if let Some(artifact) = artifact.filter(|_| session.player.is_some()) {
                    let elements = artifact
                        .elements
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    records.push((
                        MissionSpec {
                            title: format!("Craft {name}"),
                            description: format!(
                                "Successfully crafted {name} using {elements} elements"
                            ),
                            mission_type: "crafting".to_string(),
                            reward_experience: 0,
                        },
                        RemoteRecordTarget::Artifact(artifact.id.clone()),
                    ));

                    if let Some(player) = session.player.as_mut() {
                        player.artifacts.push(artifact);
                    }
                    session.selected_elements.clear();

                    // Crafting feeds the active mission's progress.
                    if let Some(mission_id) = session.current_mission_id.clone() {
                        let reached = session
                            .player
                            .as_mut()
                            .and_then(|p| p.missions.iter_mut().find(|m| m.id == mission_id))
                            .is_some_and(|m| m.advance());
                        if reached
                            && let Some(spec) = session.complete_mission(&mission_id)
                        {
                            records.push((spec, RemoteRecordTarget::Mission(mission_id)));
                        }
                    }

                    self.persist_player(&mut session);
                }

                session.push_notification(
                    NotificationKind::Success,
                    "Crafting Successful!",
                    format!("You successfully crafted {name}!"),
                );
            } else {
                session.push_notification(
                    NotificationKind::Error,
                    "Crafting Failed",
                    "The elements didn't combine properly. Try again!",
                );
            }
            self.publish(&session);
        }

        for (spec, target) in records {
            self.spawn_remote_record(spec, target);
        }
        if success {
            self.schedule_reconcile();
        }
    }

    /// Appends a notification to the bounded feed.
    pub fn add_notification(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        let mut session = self.lock();
        session.push_notification(kind, title, message);
        self.publish(&session);
    }

    pub fn mark_notification_read(&self, notification_id: &str) {
        let mut session = self.lock();
        if let Some(n) = session
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
        {
            n.read = true;
            self.publish(&session);
        }
    }

    pub fn clear_notifications(&self) {
        let mut session = self.lock();
        session.notifications.clear();
        self.publish(&session);
    }

    /// Lists an artifact on the marketplace.
    ///
    /// Ownership moves: the artifact leaves the inventory and enters the
    /// listing set, never existing in both. Listing an already-listed or
    /// unknown artifact is a soft no-op.
    pub fn list_artifact(&self, artifact_id: &str) {
        let mut session = self.lock();
        let Some(player) = session.player.as_mut() else {
            return;
        };
        let Some(pos) = player.artifacts.iter().position(|a| a.id == artifact_id) else {
            debug!(artifact_id, "list_artifact on unowned artifact; ignoring");
            return;
        };
        let artifact = player.artifacts.remove(pos);
        session.marketplace.push(artifact);

        self.persist_player(&mut session);
        self.persist_marketplace(&mut session);
        self.publish(&session);
    }

    /// Returns a listed artifact to its owner's inventory.
    pub fn unlist_artifact(&self, artifact_id: &str) {
        let mut session = self.lock();
        let Some(wallet) = session.player.as_ref().map(|p| p.wallet_address.clone()) else {
            return;
        };
        let Some(pos) = session
            .marketplace
            .iter()
            .position(|a| a.id == artifact_id && a.owner == wallet)
        else {
            debug!(artifact_id, "unlist_artifact on unlisted artifact; ignoring");
            return;
        };
        let artifact = session.marketplace.remove(pos);
        if let Some(player) = session.player.as_mut() {
            player.artifacts.push(artifact);
        }

        self.persist_player(&mut session);
        self.persist_marketplace(&mut session);
        self.publish(&session);
    }

    /// Fetches remote state and merges identifiers onto local entities.
    ///
    /// Idempotent and field-scoped: locally owned numerics are never
    /// regressed by a stale response.
    pub async fn sync_with_remote(&self) {
        let Some(wallet) = self.lock().player.as_ref().map(|p| p.wallet_address.clone()) else {
            debug!("sync before initialization; ignoring");
            return;
        };

        let Some(remote) = self.progression.sync_player_data(&wallet).await else {
            debug!(%wallet, "no remote record to sync");
            return;
        };

        let mut session = self.lock();
        let Some(player) = session.player.as_mut() else {
            return;
        };
        if merge_remote(player, &remote) {
            self.persist_player(&mut session);
            self.publish(&session);
        }
    }

    /// Latest notifications, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().notifications.clone()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, Session> {
        // A poisoned session mutex means a transaction panicked mid-write;
        // continuing would operate on a torn aggregate.
        self.state.lock().expect("session mutex poisoned")
    }

    fn publish(&self, session: &Session) {
        self.snapshot_tx.send_replace(session.snapshot());
    }

    /// Write-through of the player aggregate.
    ///
    /// A failed durable write threatens persistence, so it surfaces as an
    /// error notification, but the session continues on in-memory state.
    fn persist_player(&self, session: &mut Session) {
        let Some(player) = session.player.as_ref() else {
            return;
        };
        let key = keys::player(&player.wallet_address);
        if let Err(err) = storage::save(&*self.storage, &key, player) {
            error!(%err, %key, "failed to persist player");
            session.push_notification(
                NotificationKind::Error,
                "Save Failed",
                "Your progress could not be written to storage",
            );
        }
    }

    fn persist_marketplace(&self, session: &mut Session) {
        if let Err(err) = storage::save(&*self.storage, keys::MARKETPLACE, &session.marketplace) {
            error!(%err, "failed to persist marketplace");
            session.push_notification(
                NotificationKind::Error,
                "Save Failed",
                "The marketplace could not be written to storage",
            );
        }
    }

    fn load_marketplace(&self) -> Vec<Artifact> {
        match storage::load(&*self.storage, keys::MARKETPLACE) {
            Ok(listings) => listings.unwrap_or_default(),
            Err(err) => {
                warn!(%err, "failed to load marketplace; starting empty");
                Vec::new()
            }
        }
    }

    /// Fire-and-forget creation of a remote mission record, merging the
    /// settled id back onto its local target. Merge-only: an id that is
    /// already set is never overwritten by a late response.
    fn spawn_remote_record(&self, spec: MissionSpec, target: RemoteRecordTarget) {
        let Some(wallet) = self.lock().player.as_ref().map(|p| p.wallet_address.clone()) else {
            return;
        };

        let progression = Arc::clone(&self.progression);
        let state = Arc::clone(&self.state);
        let snapshot_tx = self.snapshot_tx.clone();
        tokio::spawn(async move {
            let remote = progression.create_mission(&wallet, spec).await;

            let mut session = state.lock().expect("session mutex poisoned");
            let Some(player) = session.player.as_mut() else {
                return;
            };
            let slot = match &target {
                RemoteRecordTarget::Artifact(id) => player
                    .artifacts
                    .iter_mut()
                    .find(|a| a.id == *id)
                    .map(|a| &mut a.remote_mission_id),
                RemoteRecordTarget::Mission(id) => player
                    .missions
                    .iter_mut()
                    .find(|m| m.id == *id)
                    .map(|m| &mut m.remote_mission_id),
            };
            if let Some(slot) = slot
                && slot.is_none()
            {
                *slot = Some(remote.id);
                snapshot_tx.send_replace(session.snapshot());
            }
        });
    }

    /// Coalesced reconciliation push.
    ///
    /// Marks the session dirty and ensures exactly one pusher task is
    /// running; the task drains the dirty flag in a loop, so bursts of
    /// transactions collapse into the fewest pushes the remote can absorb.
    fn schedule_reconcile(&self) {
        self.sync_dirty.store(true, Ordering::SeqCst);
        if self.sync_running.swap(true, Ordering::SeqCst) {
            return;
        }

        let dirty = Arc::clone(&self.sync_dirty);
        let running = Arc::clone(&self.sync_running);
        let state = Arc::clone(&self.state);
        let progression = Arc::clone(&self.progression);
        let snapshot_tx = self.snapshot_tx.clone();

        tokio::spawn(async move {
            loop {
                if !dirty.swap(false, Ordering::SeqCst) {
                    running.store(false, Ordering::SeqCst);
                    // A transaction may have marked dirty between the check
                    // and the release; reclaim the runner slot if so.
                    if dirty.load(Ordering::SeqCst) && !running.swap(true, Ordering::SeqCst) {
                        continue;
                    }
                    return;
                }

                let pending = {
                    let session = state.lock().expect("session mutex poisoned");
                    session.player.as_ref().map(|p| {
                        (
                            p.wallet_address.clone(),
                            ProfilePatch {
                                level: p.level,
                                experience: p.experience,
                                reputation: p.reputation,
                            },
                        )
                    })
                };
                let Some((wallet, patch)) = pending else {
                    continue;
                };

                let outcome = progression.update_player(&wallet, patch).await;
                debug!(
                    %wallet,
                    status = %outcome.status.label(),
                    "reconciliation push settled"
                );

                if outcome.status.is_confirmed() {
                    let mut session = state.lock().expect("session mutex poisoned");
                    if let Some(player) = session
                        .player
                        .as_mut()
                        .filter(|p| p.wallet_address == wallet)
                    {
                        player.chain_interactions += 1;
                        snapshot_tx.send_replace(session.snapshot());
                    }
                }
            }
        });
    }
}
