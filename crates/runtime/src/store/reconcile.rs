//! Field-scoped merge of remote identifiers onto local entities.
//!
//! Reconciliation responses can arrive out of order and arbitrarily late, so
//! a merge only ever touches remote-owned fields: identifier correlations
//! and the remote reputation counter. Locally owned numerics (experience,
//! level, health) are never overwritten by a sync response.

use quest_core::Player;

use crate::progression::RemoteSnapshot;

/// Merges remote identifiers onto matching local entities.
///
/// Traits correlate by kind, missions by title. The match is best-effort,
/// not guaranteed unique. An already-correlated local entity keeps its id; a
/// stale snapshot can never re-point it.
///
/// Returns true when anything changed.
pub fn merge_remote(player: &mut Player, remote: &RemoteSnapshot) -> bool {
    let mut changed = false;

    if player.remote_player_id.as_deref() != Some(remote.player_id.as_str()) {
        player.remote_player_id = Some(remote.player_id.clone());
        changed = true;
    }

    if player.remote_reputation != remote.reputation {
        player.remote_reputation = remote.reputation;
        changed = true;
    }

    for local in &mut player.traits {
        if local.remote_trait_id.is_some() {
            continue;
        }
        if let Some(remote_trait) = remote.traits.iter().find(|t| t.kind == local.kind) {
            local.remote_trait_id = Some(remote_trait.id.clone());
            changed = true;
        }
    }

    for local in &mut player.missions {
        if local.remote_mission_id.is_some() {
            continue;
        }
        if let Some(remote_mission) = remote.missions.iter().find(|m| m.title == local.title) {
            local.remote_mission_id = Some(remote_mission.id.clone());
            changed = true;
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use quest_core::{Mission, MissionRewards, TraitKind};

    use crate::progression::{RemoteMission, RemoteTrait};

    use super::*;

    fn snapshot_with(traits: Vec<RemoteTrait>, missions: Vec<RemoteMission>) -> RemoteSnapshot {
        RemoteSnapshot {
            player_id: "profile_w".into(),
            reputation: 42,
            traits,
            missions,
            last_sync: Utc::now(),
        }
    }

    #[test]
    fn merge_is_scoped_to_remote_owned_fields() {
        let mut player = Player::new("w");
        player.experience = 120;
        player.level = 3;
        player.health = 80;

        // Stale remote numbers must not regress local progression.
        let remote = snapshot_with(Vec::new(), Vec::new());
        merge_remote(&mut player, &remote);

        assert_eq!(player.experience, 120);
        assert_eq!(player.level, 3);
        assert_eq!(player.health, 80);
        assert_eq!(player.remote_player_id.as_deref(), Some("profile_w"));
        assert_eq!(player.remote_reputation, 42);
    }

    #[test]
    fn traits_correlate_by_kind() {
        let mut player = Player::new("w");
        let remote = snapshot_with(
            vec![RemoteTrait {
                id: "rt_1".into(),
                kind: TraitKind::FireMaster,
                level: 1,
            }],
            Vec::new(),
        );

        assert!(merge_remote(&mut player, &remote));
        let fire = player.trait_of_kind(TraitKind::FireMaster).unwrap();
        assert_eq!(fire.remote_trait_id.as_deref(), Some("rt_1"));
    }

    #[test]
    fn missions_correlate_by_title_without_repointing() {
        let mut player = Player::new("w");
        let mut mission = Mission::new("First Steps", "d", 3, MissionRewards::default());
        mission.remote_mission_id = Some("already".into());
        player.missions.push(mission);
        player.missions.push(Mission::new("Other", "d", 1, MissionRewards::default()));

        let remote = snapshot_with(
            Vec::new(),
            vec![RemoteMission {
                id: "rm_1".into(),
                title: "First Steps".into(),
                mission_type: "crafting".into(),
                reward_experience: 150,
                completed: false,
            }],
        );

        merge_remote(&mut player, &remote);
        assert_eq!(player.missions[0].remote_mission_id.as_deref(), Some("already"));
        assert_eq!(player.missions[1].remote_mission_id, None);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut player = Player::new("w");
        let remote = snapshot_with(Vec::new(), Vec::new());

        assert!(merge_remote(&mut player, &remote));
        assert!(!merge_remote(&mut player, &remote));
    }
}
