//! Deterministic progression model and crafting rules shared across clients.
//!
//! `quest-core` defines the canonical player aggregate (traits, artifacts,
//! missions, notifications) and the pure crafting engine. All randomness is
//! injected by the caller, so every function here is deterministic given its
//! inputs and can be exercised directly in tests. Runtime layers own the
//! mutation flow; this crate only provides the types and the rules.
pub mod artifact;
pub mod crafting;
pub mod element;
pub mod experience;
pub mod ident;
pub mod mission;
pub mod notification;
pub mod player;

pub use artifact::Artifact;
pub use crafting::{
    BASE_SUCCESS_RATE, CraftError, CraftOutcome, MAX_ELEMENTS, MAX_SUCCESS_RATE, artifact_name,
    artifact_power, attempt_craft, determine_rarity, rarity_score, success_chance,
};
pub use element::{ElementType, Rarity};
pub use experience::{can_level_up, experience_to_next};
pub use ident::generate_id;
pub use mission::{Mission, MissionRewards};
pub use notification::{Notification, NotificationKind};
pub use player::{Player, PlayerTrait, PlayerUpdate, TraitKind};
