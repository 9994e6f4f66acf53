//! Hit resolution: accuracy, crit, damage and variance in one pass.

use crate::config::BattleConfig;
use crate::env::RandomSource;
use crate::stats::{Combatant, CombatantId, Element, Stats};

use super::damage::{apply_variance, calculate_raw_damage};
use super::hit::{calculate_crit_chance, calculate_hit_chance, crit_multiplier};

/// Stats locked in at the moment a hit is resolved.
///
/// Built by the engine from base stats, status modifiers and boss phase
/// multipliers so resolution never reads mutable battle state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatSnapshot {
    pub id: CombatantId,
    pub stats: Stats,
    pub element: Element,
    pub defending: bool,
}

impl CombatSnapshot {
    /// Snapshot using the combatant's base stats with no modifiers.
    pub fn of(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            stats: combatant.stats,
            element: combatant.element,
            defending: combatant.defending,
        }
    }
}

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    /// Attack was dodged.
    Miss,
    Hit,
    Critical,
}

/// Result of a single hit resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitResult {
    pub hit: bool,
    pub critical: bool,
    /// 0 on a miss, at least the configured minimum on a hit.
    pub damage: u32,
    pub hit_chance: f64,
    pub element_multiplier: f64,
}

impl HitResult {
    pub fn outcome(&self) -> AttackOutcome {
        match (self.hit, self.critical) {
            (false, _) => AttackOutcome::Miss,
            (true, false) => AttackOutcome::Hit,
            (true, true) => AttackOutcome::Critical,
        }
    }
}

/// Resolve one hit of `attacker` against `defender`.
///
/// This is the single entry point for every damage computation: basic
/// attacks, ability damage, each strike of a multi-hit, companion attacks.
///
/// # Roll order
///
/// 1. Accuracy: `hit_chance = clamp(0.95 + accuracy - dodge, 0.5, 1.0)`; a
///    miss stops here with 0 damage.
/// 2. Crit: `crit_chance = clamp(0.05 + crit_rate, 0, 0.5)`.
/// 3. Variance: uniform jitter of ±10%.
///
/// # Arguments
///
/// * `base_value` - Overrides the attacker's attack as the damage base
/// * `multiplier` - Ability power multiplier (1.0 for basic attacks)
///
/// HP is not touched; the caller applies the returned damage.
pub fn resolve_hit(
    attacker: &CombatSnapshot,
    defender: &CombatSnapshot,
    base_value: Option<f64>,
    multiplier: f64,
    config: &BattleConfig,
    rng: &mut dyn RandomSource,
) -> HitResult {
    let hit_chance = calculate_hit_chance(
        attacker.stats.accuracy,
        defender.stats.dodge,
        &config.hit,
    );
    let element_multiplier = attacker
        .element
        .multiplier_against(defender.element, &config.damage);

    // 1. Check if attack hits
    if !rng.chance(hit_chance) {
        return HitResult {
            hit: false,
            critical: false,
            damage: 0,
            hit_chance,
            element_multiplier,
        };
    }

    // 2. Raw damage, elemental scaling before defense
    let base = base_value.unwrap_or(f64::from(attacker.stats.attack));
    let mut raw = calculate_raw_damage(
        base,
        element_multiplier,
        multiplier,
        f64::from(defender.stats.defense),
        &config.damage,
    );

    // 3. Critical strike
    let crit_chance = calculate_crit_chance(attacker.stats.crit_rate, &config.crit);
    let critical = rng.chance(crit_chance);
    if critical {
        raw *= crit_multiplier(attacker.stats.crit_damage, &config.crit);
    }

    // 4. Variance, floor, re-clamp
    let jitter = rng.jitter(config.damage.variance);
    let mut damage = apply_variance(raw, jitter, &config.damage);

    if defender.defending {
        let reduced = (f64::from(damage) * config.damage.defend_multiplier).floor() as u32;
        damage = reduced.max(config.damage.minimum);
    }

    HitResult {
        hit: true,
        critical,
        damage,
        hit_chance,
        element_multiplier,
    }
}
