//! Elemental families and artifact rarity tiers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Elemental component that can be slotted into a crafting attempt.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ElementType {
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Dark,
    Void,
}

/// Artifact rarity tier, ordered from weakest to strongest.
///
/// The derived `Ord` follows declaration order, so comparisons like
/// `rarity >= Rarity::Epic` behave as expected.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Power multiplier applied when computing a crafted artifact's power.
    pub const fn power_multiplier(&self) -> f64 {
        match self {
            Self::Common => 1.0,
            Self::Uncommon => 1.5,
            Self::Rare => 2.5,
            Self::Epic => 4.0,
            Self::Legendary => 6.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_ordering_follows_tiers() {
        assert!(Rarity::Common < Rarity::Uncommon);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Legendary > Rarity::Epic);
    }

    #[test]
    fn element_serializes_snake_case() {
        let json = serde_json::to_string(&ElementType::Fire).unwrap();
        assert_eq!(json, "\"fire\"");
    }
}
