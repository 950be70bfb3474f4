//! Tolerance-based similarity scoring
//!
//! Maps the distance between a learner value and a target value onto 0..100:
//! a small dead zone snaps to 100, anything past the tolerance is 0, and the
//! range in between falls off linearly.

/// Default fraction of the tolerance that counts as a perfect match
pub const DEFAULT_DEAD_ZONE: f64 = 0.1;

/// Score `player` against `target` with the default dead zone.
///
/// `tolerance` must be > 0; that is a caller contract, not checked here.
pub fn similarity(player: f64, target: f64, tolerance: f64) -> u8 {
    similarity_with_dead_zone(player, target, tolerance, DEFAULT_DEAD_ZONE)
}

/// Score `player` against `target` with an explicit dead-zone fraction
pub fn similarity_with_dead_zone(player: f64, target: f64, tolerance: f64, dead_zone: f64) -> u8 {
    let diff = (player - target).abs();

    if diff <= dead_zone * tolerance {
        return 100;
    }
    if diff > tolerance {
        return 0;
    }

    clamp_score(100.0 * (1.0 - diff / tolerance))
}

/// Round and clamp any raw score into 0..=100
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Rounded mean of sub-scores; 0 when there are none
pub fn mean_score(scores: &[u8]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let sum: f64 = scores.iter().map(|&s| s as f64).sum();
    clamp_score(sum / scores.len() as f64)
}

/// Rounded percentage of `passed` out of `total`; 0 when `total` is 0
pub fn ratio_score(passed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    clamp_score(100.0 * passed as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_perfect() {
        for tol in [0.05, 0.1, 3.0, 6.0, 15.0] {
            assert_eq!(similarity(1.25, 1.25, tol), 100);
        }
    }

    #[test]
    fn test_dead_zone_snaps() {
        // 0.3 dB off with 3 dB tolerance sits exactly on the dead-zone edge
        assert_eq!(similarity(3.3, 3.0, 3.0), 100);
        assert_eq!(similarity(0.0, 0.29, 3.0), 100);
    }

    #[test]
    fn test_linear_falloff() {
        assert_eq!(similarity(1.5, 0.0, 3.0), 50);
        assert_eq!(similarity(0.0, 1.0, 3.0), 67);
        assert_eq!(similarity(-20.0, -26.0, 6.0), 0);
        assert_eq!(similarity(-20.0, -23.0, 6.0), 50);
    }

    #[test]
    fn test_outside_tolerance_is_zero() {
        assert_eq!(similarity(3.01, 0.0, 3.0), 0);
        assert_eq!(similarity(-12.0, 12.0, 3.0), 0);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let mut last = 100u8;
        for step in 0..200 {
            let score = similarity(step as f64 * 0.05, 0.0, 3.0);
            assert!(score <= last, "score rose at step {}", step);
            assert!(score <= 100);
            last = score;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn test_mean_and_ratio() {
        assert_eq!(mean_score(&[]), 0);
        assert_eq!(mean_score(&[100, 50]), 75);
        assert_eq!(mean_score(&[100, 100, 67]), 89);
        assert_eq!(ratio_score(2, 3), 67);
        assert_eq!(ratio_score(0, 0), 0);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5.0), 0);
        assert_eq!(clamp_score(140.0), 100);
        assert_eq!(clamp_score(f64::NAN), 0);
        assert_eq!(clamp_score(74.5), 75);
    }
}
