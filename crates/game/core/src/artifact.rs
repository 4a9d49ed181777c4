//! Crafted artifacts owned by a single player at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::element::{ElementType, Rarity};
use crate::ident::generate_id;

/// A crafted, player-owned object.
///
/// Artifacts are created only by a successful crafting attempt and belong to
/// exactly one owner. Listing one on the marketplace moves it out of the
/// owner's inventory; the two sets never hold the same artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub power: u64,
    /// Element multiset used in the craft (1..=4 entries, repeats allowed).
    pub elements: Vec<ElementType>,
    pub crafted_at: DateTime<Utc>,
    /// Wallet address of the current owner.
    pub owner: String,
    /// Remote mission record correlating this craft, once reconciled.
    pub remote_mission_id: Option<String>,
}

impl Artifact {
    pub fn new(
        name: impl Into<String>,
        rarity: Rarity,
        power: u64,
        elements: Vec<ElementType>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            rarity,
            power,
            elements,
            crafted_at: Utc::now(),
            owner: owner.into(),
            remote_mission_id: None,
        }
    }
}
