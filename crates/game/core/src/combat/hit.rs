//! Accuracy and critical strike chances.

use crate::config::{CritParams, HitParams};

/// Chance that an attack connects.
///
/// # Formula
///
/// ```text
/// hit_chance = clamp(base + accuracy - dodge, min, max)
/// ```
pub fn calculate_hit_chance(accuracy: f64, dodge: f64, params: &HitParams) -> f64 {
    let chance = params.base + accuracy - dodge;
    chance.clamp(params.min, params.max).clamp(0.0, 1.0)
}

/// Chance that a connecting attack is critical.
///
/// ```text
/// crit_chance = clamp(base_chance + crit_rate, 0, max_chance)
/// ```
pub fn calculate_crit_chance(crit_rate: f64, params: &CritParams) -> f64 {
    (params.base_chance + crit_rate).clamp(0.0, params.max_chance)
}

/// Critical damage multiplier, clamped to the configured band.
pub fn crit_multiplier(crit_damage: f64, params: &CritParams) -> f64 {
    crit_damage.clamp(params.min_multiplier, params.max_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_chance_is_clamped() {
        let params = HitParams::default();
        assert_eq!(calculate_hit_chance(0.0, 0.0, &params), 0.95);
        assert_eq!(calculate_hit_chance(0.5, 0.0, &params), 1.0);
        assert_eq!(calculate_hit_chance(0.0, 0.9, &params), 0.5);
    }

    #[test]
    fn hit_chance_always_a_probability() {
        let params = HitParams {
            base: 0.95,
            min: -3.0,
            max: 7.0,
        };
        for (acc, dodge) in [(-10.0, 10.0), (10.0, -10.0), (0.3, 0.1)] {
            let chance = calculate_hit_chance(acc, dodge, &params);
            assert!((0.0..=1.0).contains(&chance));
        }
    }

    #[test]
    fn crit_chance_caps_at_half() {
        let params = CritParams::default();
        assert_eq!(calculate_crit_chance(0.0, &params), 0.05);
        assert_eq!(calculate_crit_chance(0.9, &params), 0.5);
        assert_eq!(calculate_crit_chance(-1.0, &params), 0.0);
    }

    #[test]
    fn crit_multiplier_band() {
        let params = CritParams::default();
        assert_eq!(crit_multiplier(1.0, &params), 1.5);
        assert_eq!(crit_multiplier(2.0, &params), 2.0);
        assert_eq!(crit_multiplier(5.0, &params), 3.0);
    }
}
