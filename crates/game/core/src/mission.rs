//! Trackable objectives with monotonic completion.

use serde::{Deserialize, Serialize};

use crate::ident::generate_id;
use crate::player::TraitKind;

/// Rewards granted exactly once when a mission completes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionRewards {
    pub experience: u64,
    /// Optional trait granted (or leveled, if already held) on completion.
    pub trait_grant: Option<TraitKind>,
}

/// A mission tracked against the local player.
///
/// State machine: NotStarted -> InProgress -> Completed. `completed` is
/// monotonic; no transition ever leaves the completed state, and
/// `progress` never exceeds `max_progress`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub title: String,
    pub description: String,
    pub progress: u32,
    pub max_progress: u32,
    pub completed: bool,
    pub rewards: MissionRewards,
    /// Identifier of the mirrored remote mission record, once reconciled.
    pub remote_mission_id: Option<String>,
}

impl Mission {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        max_progress: u32,
        rewards: MissionRewards,
    ) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            description: description.into(),
            progress: 0,
            max_progress: max_progress.max(1),
            completed: false,
            rewards,
            remote_mission_id: None,
        }
    }

    /// The starter mission every fresh player receives.
    pub fn starter() -> Self {
        Self::new(
            "First Steps",
            "Craft three artifacts to prove your talent",
            3,
            MissionRewards {
                experience: 150,
                trait_grant: Some(TraitKind::CraftingEfficiency),
            },
        )
    }

    /// Advances progress by one step, saturating at `max_progress`.
    ///
    /// Returns true when this call brought the mission to its threshold.
    /// Does not flip `completed`; reward granting and the completion flag
    /// are the store's transaction to run exactly once.
    pub fn advance(&mut self) -> bool {
        if self.completed || self.progress >= self.max_progress {
            return false;
        }
        self.progress += 1;
        self.progress >= self.max_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_saturates_at_max_progress() {
        let mut mission = Mission::new("t", "d", 2, MissionRewards::default());
        assert!(!mission.advance());
        assert!(mission.advance());
        assert_eq!(mission.progress, 2);
        assert!(!mission.advance());
        assert_eq!(mission.progress, 2);
    }

    #[test]
    fn completed_mission_never_advances() {
        let mut mission = Mission::new("t", "d", 3, MissionRewards::default());
        mission.progress = 3;
        mission.completed = true;
        assert!(!mission.advance());
        assert_eq!(mission.progress, 3);
    }
}
