//! The player aggregate: identity, progression counters, traits, inventory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::artifact::Artifact;
use crate::element::ElementType;
use crate::experience::experience_to_next;
use crate::ident::generate_id;
use crate::mission::Mission;

/// Trait families a player can hold.
///
/// One family per element plus the two crafting-related families that feed
/// into the crafting engine's bonuses.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TraitKind {
    FireMaster,
    WaterSage,
    EarthGuardian,
    AirWalker,
    LightBringer,
    DarkWalker,
    VoidTraveler,
    CraftingEfficiency,
    ArtifactAffinity,
}

impl TraitKind {
    /// The element family this trait attunes to, if any.
    pub const fn element(&self) -> Option<ElementType> {
        match self {
            Self::FireMaster => Some(ElementType::Fire),
            Self::WaterSage => Some(ElementType::Water),
            Self::EarthGuardian => Some(ElementType::Earth),
            Self::AirWalker => Some(ElementType::Air),
            Self::LightBringer => Some(ElementType::Light),
            Self::DarkWalker => Some(ElementType::Dark),
            Self::VoidTraveler => Some(ElementType::Void),
            Self::CraftingEfficiency | Self::ArtifactAffinity => None,
        }
    }

    pub const fn is_crafting_efficiency(&self) -> bool {
        matches!(self, Self::CraftingEfficiency)
    }

    pub const fn is_artifact_affinity(&self) -> bool {
        matches!(self, Self::ArtifactAffinity)
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::FireMaster => "Fire Master",
            Self::WaterSage => "Water Sage",
            Self::EarthGuardian => "Earth Guardian",
            Self::AirWalker => "Air Walker",
            Self::LightBringer => "Light Bringer",
            Self::DarkWalker => "Dark Walker",
            Self::VoidTraveler => "Void Traveler",
            Self::CraftingEfficiency => "Crafting Efficiency",
            Self::ArtifactAffinity => "Artifact Affinity",
        }
    }
}

/// A leveled trait held by a player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerTrait {
    pub id: String,
    pub kind: TraitKind,
    pub name: String,
    /// Always within 1..=max_level.
    pub level: u32,
    pub max_level: u32,
    /// Bonus magnitude fed into crafting computations.
    pub bonus: u32,
    /// Identifier of the mirrored remote trait record, once reconciled.
    pub remote_trait_id: Option<String>,
}

impl PlayerTrait {
    pub fn new(kind: TraitKind) -> Self {
        Self {
            id: generate_id(),
            kind,
            name: kind.display_name().to_string(),
            level: 1,
            max_level: 10,
            bonus: 5,
            remote_trait_id: None,
        }
    }

    /// Raises the trait level by one, clamped to `max_level`.
    pub fn level_up(&mut self) {
        if self.level < self.max_level {
            self.level += 1;
            self.bonus += 2;
        }
    }
}

/// Partial update merged into the player by `update_player` transactions.
///
/// Only the fields the UI actually patches; identifier-correlation fields
/// are owned by reconciliation and are not part of this struct.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub level: Option<u32>,
    pub experience: Option<u64>,
    pub health: Option<u32>,
    pub reputation: Option<i64>,
}

/// The authoritative per-session player aggregate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identity key, externally supplied by the wallet provider.
    pub wallet_address: String,
    pub name: String,
    pub level: u32,
    pub experience: u64,
    /// Derived from `level`; recomputed on every level-up.
    pub experience_to_next: u64,
    pub health: u32,
    pub max_health: u32,
    pub reputation: i64,
    /// Reputation counter owned by the remote service; merge-only locally.
    pub remote_reputation: i64,
    pub traits: Vec<PlayerTrait>,
    pub artifacts: Vec<Artifact>,
    pub missions: Vec<Mission>,
    /// Remote profile identifier, once reconciled.
    pub remote_player_id: Option<String>,
    /// Monotonically increasing count of confirmed ledger interactions.
    pub chain_interactions: u64,
    pub last_active: DateTime<Utc>,
}

impl Player {
    /// Creates a fresh player with the fixed starter trait set: one trait
    /// per element family, all at level 1.
    pub fn new(wallet_address: impl Into<String>) -> Self {
        let wallet_address = wallet_address.into();
        // Addresses are opaque strings; truncate on char boundaries.
        let short: String = wallet_address.chars().take(6).collect();
        let name = format!("Player {short}");
        let traits = TraitKind::iter()
            .filter(|kind| kind.element().is_some())
            .map(PlayerTrait::new)
            .collect();

        Self {
            wallet_address,
            name,
            level: 1,
            experience: 0,
            experience_to_next: experience_to_next(1),
            health: 100,
            max_health: 100,
            reputation: 0,
            remote_reputation: 0,
            traits,
            artifacts: Vec::new(),
            missions: Vec::new(),
            remote_player_id: None,
            chain_interactions: 0,
            last_active: Utc::now(),
        }
    }

    /// Merges a partial update into this player.
    pub fn apply_update(&mut self, update: &PlayerUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(level) = update.level {
            self.level = level.max(1);
            self.experience_to_next = experience_to_next(self.level);
        }
        if let Some(experience) = update.experience {
            self.experience = experience;
        }
        if let Some(health) = update.health {
            self.health = health.min(self.max_health);
        }
        if let Some(reputation) = update.reputation {
            self.reputation = reputation;
        }
        self.last_active = Utc::now();
    }

    pub fn trait_of_kind(&self, kind: TraitKind) -> Option<&PlayerTrait> {
        self.traits.iter().find(|t| t.kind == kind)
    }

    pub fn mission(&self, mission_id: &str) -> Option<&Mission> {
        self.missions.iter().find(|m| m.id == mission_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_player_has_one_trait_per_element_family() {
        let player = Player::new("wallet123");
        assert_eq!(player.traits.len(), 7);
        for t in &player.traits {
            assert!(t.kind.element().is_some());
            assert_eq!(t.level, 1);
        }
        assert_eq!(player.level, 1);
        assert_eq!(player.experience_to_next, 100);
    }

    #[test]
    fn multibyte_wallet_address_truncates_on_char_boundaries() {
        let player = Player::new("🔥🔥wallet");
        assert_eq!(player.name, "Player 🔥🔥wall");

        let short = Player::new("ab");
        assert_eq!(short.name, "Player ab");
    }

    #[test]
    fn apply_update_merges_only_present_fields() {
        let mut player = Player::new("wallet123");
        player.reputation = 7;
        player.apply_update(&PlayerUpdate {
            level: Some(5),
            ..Default::default()
        });
        assert_eq!(player.level, 5);
        assert_eq!(player.reputation, 7);
        assert_eq!(player.experience_to_next, experience_to_next(5));
    }

    #[test]
    fn health_update_is_clamped_to_max() {
        let mut player = Player::new("wallet123");
        player.apply_update(&PlayerUpdate {
            health: Some(500),
            ..Default::default()
        });
        assert_eq!(player.health, player.max_health);
    }

    #[test]
    fn trait_level_up_clamps_at_max() {
        let mut t = PlayerTrait::new(TraitKind::CraftingEfficiency);
        t.level = t.max_level;
        let bonus = t.bonus;
        t.level_up();
        assert_eq!(t.level, t.max_level);
        assert_eq!(t.bonus, bonus);
    }
}
