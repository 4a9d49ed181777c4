//! Experience curve shared by the store and the progression service.

/// Experience required to advance past the given level.
///
/// Geometric curve: `floor(100 * 1.5^(level - 1))`. Level 1 needs 100 XP,
/// level 2 needs 150, level 3 needs 225, and so on.
pub fn experience_to_next(level: u32) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (100.0 * 1.5f64.powi(exponent)).floor() as u64
}

/// Whether the accumulated experience crosses the current level's threshold.
pub fn can_level_up(experience: u64, level: u32) -> bool {
    experience >= experience_to_next(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_matches_expected_values() {
        assert_eq!(experience_to_next(1), 100);
        assert_eq!(experience_to_next(2), 150);
        assert_eq!(experience_to_next(3), 225);
        assert_eq!(experience_to_next(4), 337);
    }

    #[test]
    fn level_up_requires_full_threshold() {
        assert!(!can_level_up(99, 1));
        assert!(can_level_up(100, 1));
        assert!(can_level_up(151, 2));
    }
}
