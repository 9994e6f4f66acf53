/// Battle configuration constants and tunable balance parameters.
///
/// Compile-time capacities live as associated constants; everything a designer
/// may want to tweak is a runtime field so `balance.toml` can override it.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub hit: HitParams,
    pub crit: CritParams,
    pub damage: DamageParams,
    pub escape: EscapeParams,
    pub rewards: RewardParams,
    pub limits: LimitParams,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum simultaneous status effects on a single combatant.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Maximum abilities a single combatant can carry.
    pub const MAX_ABILITIES: usize = 8;
    /// Maximum number of boss phases.
    pub const MAX_BOSS_PHASES: usize = 4;

    pub fn new() -> Self {
        Self::default()
    }
}

/// Accuracy roll parameters.
///
/// `hit_chance = clamp(base + accuracy - dodge, min, max)`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitParams {
    pub base: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            base: 0.95,
            min: 0.5,
            max: 1.0,
        }
    }
}

/// Critical strike parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CritParams {
    pub base_chance: f64,
    pub max_chance: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
}

impl Default for CritParams {
    fn default() -> Self {
        Self {
            base_chance: 0.05,
            max_chance: 0.5,
            min_multiplier: 1.5,
            max_multiplier: 3.0,
        }
    }
}

/// Raw damage parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageParams {
    /// Fraction of defense subtracted from the scaled attack.
    pub defense_factor: f64,
    /// Half-width of the uniform jitter band (0.1 = ±10%).
    pub variance: f64,
    pub minimum: u32,
    pub strong_multiplier: f64,
    pub weak_multiplier: f64,
    /// Incoming damage multiplier while the defender is defending.
    pub defend_multiplier: f64,
    /// Fraction of max HP restored by a consumable item.
    pub item_heal_ratio: f64,
}

impl Default for DamageParams {
    fn default() -> Self {
        Self {
            defense_factor: 0.5,
            variance: 0.1,
            minimum: 1,
            strong_multiplier: 1.5,
            weak_multiplier: 0.7,
            defend_multiplier: 0.5,
            item_heal_ratio: 0.3,
        }
    }
}

/// Escape roll parameters.
///
/// `chance = clamp(base + speed_diff * speed_factor - level_diff * level_factor, min, max)`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EscapeParams {
    pub base: f64,
    pub speed_factor: f64,
    pub level_factor: f64,
    pub min_chance: f64,
    pub max_chance: f64,
    pub max_attempts: u32,
    /// Rounds that must pass between two escape attempts.
    pub cooldown_rounds: u32,
}

impl Default for EscapeParams {
    fn default() -> Self {
        Self {
            base: 0.5,
            speed_factor: 0.002,
            level_factor: 0.05,
            min_chance: 0.1,
            max_chance: 0.95,
            max_attempts: 3,
            cooldown_rounds: 2,
        }
    }
}

/// Thresholds for reward bonuses.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardParams {
    /// Victories in at most this many rounds earn the speed bonus.
    pub speed_bonus_rounds: u32,
    /// Consecutive player-side hits needed for the combo bonus.
    pub combo_threshold: u32,
    /// A killing blow of at least `ratio * remaining hp` counts as overkill.
    pub overkill_ratio: f64,
}

impl Default for RewardParams {
    fn default() -> Self {
        Self {
            speed_bonus_rounds: 5,
            combo_threshold: 3,
            overkill_ratio: 1.5,
        }
    }
}

/// Safety limits for automated battles.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LimitParams {
    pub max_rounds: u32,
    /// Chance that a companion opens its turn with a ready ability.
    pub companion_skill_chance: f64,
}

impl Default for LimitParams {
    fn default() -> Self {
        Self {
            max_rounds: 100,
            companion_skill_chance: 0.3,
        }
    }
}
