//! Damage calculation and application.

use crate::config::DamageParams;

/// Raw damage before crit and variance.
///
/// # Formula
///
/// ```text
/// raw = max(minimum, base × element_multiplier × multiplier - defense × defense_factor)
/// ```
///
/// The elemental multiplier scales the attack side before defense is
/// subtracted, at every call site.
pub fn calculate_raw_damage(
    base: f64,
    element_multiplier: f64,
    multiplier: f64,
    defense: f64,
    params: &DamageParams,
) -> f64 {
    let scaled = base * element_multiplier * multiplier;
    let reduced = scaled - defense * params.defense_factor;
    reduced.max(f64::from(params.minimum))
}

/// Applies a variance jitter, floors, and re-clamps to the minimum.
///
/// `jitter` is the already-rolled offset in `[-variance, +variance]`.
pub fn apply_variance(damage: f64, jitter: f64, params: &DamageParams) -> u32 {
    let varied = (damage * (1.0 + jitter)).floor();
    let clamped = varied.max(f64::from(params.minimum));
    clamped.min(f64::from(u32::MAX)) as u32
}

/// Apply damage to current HP.
///
/// # Returns
///
/// New HP value (clamped to 0)
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defense_subtracts_half() {
        let params = DamageParams::default();
        assert_eq!(calculate_raw_damage(50.0, 1.0, 1.0, 10.0, &params), 45.0);
    }

    #[test]
    fn element_scales_before_defense() {
        let params = DamageParams::default();
        // 40 × 1.5 - 20 × 0.5 = 50, not (40 - 10) × 1.5 = 45
        assert_eq!(calculate_raw_damage(40.0, 1.5, 1.0, 20.0, &params), 50.0);
    }

    #[test]
    fn raw_damage_has_a_floor() {
        let params = DamageParams::default();
        assert_eq!(calculate_raw_damage(5.0, 0.7, 1.0, 100.0, &params), 1.0);
    }

    #[test]
    fn variance_floors_and_clamps() {
        let params = DamageParams::default();
        assert_eq!(apply_variance(45.0, 0.0, &params), 45);
        assert_eq!(apply_variance(45.0, -0.1, &params), 40);
        assert_eq!(apply_variance(45.0, 0.099, &params), 49);
        assert_eq!(apply_variance(1.0, -0.1, &params), 1);
    }

    #[test]
    fn hp_never_underflows() {
        assert_eq!(apply_damage(10, 3), 7);
        assert_eq!(apply_damage(10, 30), 0);
    }
}
