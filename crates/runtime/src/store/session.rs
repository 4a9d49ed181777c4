//! In-memory session state and its pure mutation helpers.
//!
//! `Session` is only ever touched behind the store's mutex; helpers here do
//! no I/O and no locking, which keeps every transaction's synchronous part
//! small and testable.

use quest_core::{
    Artifact, ElementType, Notification, NotificationKind, Player, PlayerTrait, can_level_up,
    experience_to_next,
};

use crate::progression::MissionSpec;

use super::snapshot::Snapshot;

pub(crate) struct Session {
    pub player: Option<Player>,
    /// Mission currently advanced by crafting successes.
    pub current_mission_id: Option<String>,
    pub crafting_in_progress: bool,
    pub selected_elements: Vec<ElementType>,
    pub marketplace: Vec<Artifact>,
    pub notifications: Vec<Notification>,
    pub notification_capacity: usize,
}

impl Session {
    pub fn new(notification_capacity: usize) -> Self {
        Self {
            player: None,
            current_mission_id: None,
            crafting_in_progress: false,
            selected_elements: Vec::new(),
            marketplace: Vec::new(),
            notifications: Vec::new(),
            notification_capacity: notification_capacity.max(1),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.player.clone(),
            crafting_in_progress: self.crafting_in_progress,
            selected_elements: self.selected_elements.clone(),
            marketplace: self.marketplace.clone(),
            notifications: self.notifications.clone(),
        }
    }

    /// Prepends a notification, dropping the oldest beyond capacity.
    pub fn push_notification(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.notifications
            .insert(0, Notification::new(kind, title, message));
        self.notifications.truncate(self.notification_capacity);
    }

    /// Adds experience and applies at most one level-up.
    ///
    /// Multi-level jumps are deliberately collapsed to a single level gain
    /// per call; the leftover experience stays banked and triggers the next
    /// level on the following grant.
    pub fn apply_experience(&mut self, amount: u64) -> bool {
        let Some(player) = self.player.as_mut() else {
            return false;
        };

        player.experience += amount;
        if !can_level_up(player.experience, player.level) {
            return false;
        }

        player.experience -= experience_to_next(player.level);
        player.level += 1;
        player.experience_to_next = experience_to_next(player.level);

        let level = player.level;
        self.push_notification(
            NotificationKind::Success,
            "Level Up!",
            format!("You reached level {level}"),
        );
        true
    }

    /// Marks a mission completed and grants its rewards exactly once.
    ///
    /// Soft no-op (returns `None`) when the mission is missing or already
    /// completed. On completion, returns the spec for the remote
    /// record-keeping mission.
    pub fn complete_mission(&mut self, mission_id: &str) -> Option<MissionSpec> {
        let player = self.player.as_mut()?;
        let mission = player
            .missions
            .iter_mut()
            .find(|m| m.id == mission_id)
            .filter(|m| !m.completed)?;

        mission.progress = mission.max_progress;
        mission.completed = true;

        let title = mission.title.clone();
        let description = mission.description.clone();
        let rewards = mission.rewards.clone();

        // Rewards land before the completion notification is emitted.
        if let Some(kind) = rewards.trait_grant {
            match player.traits.iter_mut().find(|t| t.kind == kind) {
                Some(existing) => existing.level_up(),
                None => player.traits.push(PlayerTrait::new(kind)),
            }
        }
        self.apply_experience(rewards.experience);

        self.push_notification(
            NotificationKind::Success,
            "Mission Complete!",
            format!("{title}: rewards granted"),
        );

        if self.current_mission_id.as_deref() == Some(mission_id) {
            self.current_mission_id = self.next_incomplete_mission();
        }

        Some(MissionSpec {
            title,
            description,
            mission_type: "achievement".to_string(),
            reward_experience: rewards.experience,
        })
    }

    pub fn next_incomplete_mission(&self) -> Option<String> {
        self.player
            .as_ref()?
            .missions
            .iter()
            .find(|m| !m.completed)
            .map(|m| m.id.clone())
    }
}
