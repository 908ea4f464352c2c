//! Crash-death fear from remaining hit points.

/// Fear of dying to a crash, quadratic in missing HP.
///
/// Zero at full HP, 2.0 in the limit of no HP. Callers never evaluate this
/// for an eliminated agent, so `hp >= 1` in practice.
pub fn hp_fear(hp: u32, max_hp: u32) -> f64 {
    let ratio = f64::from(hp) / f64::from(max_hp.max(1));
    (1.0 - ratio).powi(2) * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fear_zero_at_full_hp() {
        assert_eq!(hp_fear(5, 5), 0.0);
    }

    #[test]
    fn test_fear_strictly_decreasing_in_hp() {
        let fears: Vec<f64> = (1..=5).map(|hp| hp_fear(hp, 5)).collect();
        for pair in fears.windows(2) {
            assert!(pair[0] > pair[1], "fear must fall as HP rises: {pair:?}");
        }
    }

    #[test]
    fn test_fear_bounded_by_two() {
        assert!(hp_fear(1, 5) < 2.0);
        assert_eq!(hp_fear(0, 5), 2.0);
    }
}
