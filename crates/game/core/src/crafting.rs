//! Pure crafting rules: success chance, rarity, power, and naming.
//!
//! Everything here is deterministic given its inputs; the single random draw
//! (and the name roll) come from a caller-supplied [`rand::Rng`], which keeps
//! the engine testable with a seeded generator.

use rand::Rng;

use crate::artifact::Artifact;
use crate::element::{ElementType, Rarity};
use crate::player::PlayerTrait;

/// Base probability before any bonus applies.
pub const BASE_SUCCESS_RATE: f64 = 0.5;

/// Hard ceiling on the success probability; crafting is never guaranteed.
pub const MAX_SUCCESS_RATE: f64 = 0.95;

/// Maximum number of element slots per attempt.
pub const MAX_ELEMENTS: usize = 4;

/// Bonus table for two-element combinations.
///
/// Keys are order-independent pairs; the bonus applies only when the
/// selection is exactly that pair.
const PAIR_BONUSES: [(ElementType, ElementType, f64); 6] = [
    (ElementType::Fire, ElementType::Water, 0.10),
    (ElementType::Earth, ElementType::Air, 0.10),
    (ElementType::Fire, ElementType::Earth, 0.15),
    (ElementType::Water, ElementType::Air, 0.15),
    (ElementType::Fire, ElementType::Air, 0.05),
    (ElementType::Water, ElementType::Earth, 0.05),
];

/// Validation errors raised before the engine runs.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CraftError {
    #[error("no elements selected")]
    EmptySelection,

    #[error("too many elements selected: {count} (max {MAX_ELEMENTS})")]
    TooManyElements { count: usize },
}

/// Result of one crafting attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum CraftOutcome {
    Success(Artifact),
    Failure {
        /// The probability the draw failed against, for UI feedback.
        chance: f64,
    },
}

impl CraftOutcome {
    pub fn artifact(self) -> Option<Artifact> {
        match self {
            Self::Success(artifact) => Some(artifact),
            Self::Failure { .. } => None,
        }
    }
}

/// Computes the success probability for a selection and trait set.
///
/// Base rate, plus the pair bonus when exactly one listed pair is selected,
/// plus `bonus * 0.01` per crafting-efficiency trait, clamped to
/// [`MAX_SUCCESS_RATE`].
pub fn success_chance(elements: &[ElementType], traits: &[PlayerTrait]) -> f64 {
    let mut chance = BASE_SUCCESS_RATE;

    if let [a, b] = elements {
        let (lo, hi) = if a <= b { (*a, *b) } else { (*b, *a) };
        if let Some((_, _, bonus)) = PAIR_BONUSES
            .iter()
            .find(|(x, y, _)| (*x, *y) == (lo, hi) || (*y, *x) == (lo, hi))
        {
            chance += bonus;
        }
    }

    for t in traits {
        if t.kind.is_crafting_efficiency() {
            chance += f64::from(t.bonus) * 0.01;
        }
    }

    chance.min(MAX_SUCCESS_RATE)
}

/// Weighted rarity score for a successful craft.
pub fn rarity_score(elements: &[ElementType], chance: f64, traits: &[PlayerTrait]) -> f64 {
    let affinity_count = traits.iter().filter(|t| t.kind.is_artifact_affinity()).count();
    0.2 * elements.len() as f64 + 0.3 * chance + 0.1 * affinity_count as f64
}

/// Maps a rarity score onto a discrete tier.
pub fn determine_rarity(score: f64) -> Rarity {
    if score >= 2.5 {
        Rarity::Legendary
    } else if score >= 2.0 {
        Rarity::Epic
    } else if score >= 1.5 {
        Rarity::Rare
    } else if score >= 1.0 {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

/// Computes the power of a crafted artifact.
pub fn artifact_power(elements: &[ElementType], rarity: Rarity, traits: &[PlayerTrait]) -> u64 {
    let mut power = 10.0 * elements.len() as f64 * rarity.power_multiplier();
    for t in traits {
        if t.kind.is_artifact_affinity() {
            power += f64::from(t.bonus);
        }
    }
    power.floor() as u64
}

/// Generates a name keyed to the dominant (first) element.
///
/// Elements outside the four classical families fall back to the
/// "Mystic ... Artifact" naming.
pub fn artifact_name<R: Rng>(elements: &[ElementType], rng: &mut R) -> String {
    let parts = elements.first().and_then(|element| match element {
        ElementType::Fire => Some((
            ["Burning", "Flaming", "Infernal"],
            ["Blade", "Orb", "Crystal"],
        )),
        ElementType::Water => Some((
            ["Flowing", "Aquatic", "Oceanic"],
            ["Pearl", "Gem", "Shard"],
        )),
        ElementType::Earth => Some((
            ["Solid", "Earthen", "Mountainous"],
            ["Stone", "Relic", "Fragment"],
        )),
        ElementType::Air => Some((
            ["Swift", "Aerial", "Windborne"],
            ["Feather", "Essence", "Spirit"],
        )),
        _ => None,
    });

    match parts {
        Some((prefixes, suffixes)) => format!(
            "{} {}",
            prefixes[rng.gen_range(0..prefixes.len())],
            suffixes[rng.gen_range(0..suffixes.len())]
        ),
        None => "Mystic Artifact".to_string(),
    }
}

/// Runs one full crafting attempt for `owner`.
///
/// Validates the selection, draws against the computed chance, and on
/// success assembles the artifact (rarity, power, name).
pub fn attempt_craft<R: Rng>(
    owner: &str,
    elements: &[ElementType],
    traits: &[PlayerTrait],
    rng: &mut R,
) -> Result<CraftOutcome, CraftError> {
    if elements.is_empty() {
        return Err(CraftError::EmptySelection);
    }
    if elements.len() > MAX_ELEMENTS {
        return Err(CraftError::TooManyElements {
            count: elements.len(),
        });
    }

    let chance = success_chance(elements, traits);
    if rng.r#gen::<f64>() >= chance {
        return Ok(CraftOutcome::Failure { chance });
    }

    let rarity = determine_rarity(rarity_score(elements, chance, traits));
    let power = artifact_power(elements, rarity, traits);
    let name = artifact_name(elements, rng);

    Ok(CraftOutcome::Success(Artifact::new(
        name,
        rarity,
        power,
        elements.to_vec(),
        owner,
    )))
}
