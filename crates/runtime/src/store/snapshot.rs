//! Read-only state snapshots published to observers.

use quest_core::{Artifact, ElementType, Notification, Player};

/// Immutable view of the session, published after every transaction.
///
/// Observers subscribe through [`super::GameStore::subscribe`] and re-render
/// from the latest snapshot; they never mutate state directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub player: Option<Player>,
    pub crafting_in_progress: bool,
    pub selected_elements: Vec<ElementType>,
    pub marketplace: Vec<Artifact>,
    pub notifications: Vec<Notification>,
}
