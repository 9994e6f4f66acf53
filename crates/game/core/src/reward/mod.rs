//! Reward calculator.
//!
//! Turns a finished battle into an immutable [`RewardBundle`]. Bonus
//! multipliers are kept as integer basis points and multiplied together in
//! `u128`, so the result never depends on the order bonuses are applied.

mod drops;

pub use drops::{DropEntry, roll_drops};

use crate::config::BattleConfig;
use crate::env::RandomSource;
use crate::state::{BattleState, Outcome};

const BASIS_POINTS: u128 = 10_000;

/// Difficulty selected for an encounter.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
}

impl Difficulty {
    /// Multiplier on base exp and gold.
    pub const fn reward_multiplier(&self) -> f64 {
        match self {
            Self::Easy => 0.8,
            Self::Normal => 1.0,
            Self::Hard => 1.5,
            Self::Nightmare => 2.0,
        }
    }

    /// Multiplier on enemy hp, attack and defense at encounter setup.
    pub const fn stat_multiplier(&self) -> f64 {
        match self {
            Self::Easy => 0.8,
            Self::Normal => 1.0,
            Self::Hard => 1.2,
            Self::Nightmare => 1.5,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BonusKind {
    /// The player side took no damage.
    PerfectVictory,
    /// Won within the configured number of rounds.
    SpeedBonus,
    Overkill,
    ComboBonus,
    FirstTime,
}

impl BonusKind {
    /// `(exp, gold)` multipliers in basis points.
    pub const fn basis_points(&self) -> (u32, u32) {
        match self {
            Self::PerfectVictory => (15_000, 15_000),
            Self::SpeedBonus => (12_000, 12_000),
            Self::Overkill => (13_000, 11_000),
            Self::ComboBonus => (11_000, 11_000),
            Self::FirstTime => (20_000, 20_000),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedBonus {
    pub kind: BonusKind,
    pub exp_multiplier: f64,
    pub gold_multiplier: f64,
}

impl From<BonusKind> for AppliedBonus {
    fn from(kind: BonusKind) -> Self {
        let (exp, gold) = kind.basis_points();
        Self {
            kind,
            exp_multiplier: f64::from(exp) / BASIS_POINTS as f64,
            gold_multiplier: f64::from(gold) / BASIS_POINTS as f64,
        }
    }
}

/// Facts about the encounter that the battle itself cannot know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardContext {
    /// First clear of this encounter.
    pub first_time: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardBundle {
    pub exp: u64,
    pub gold: u64,
    pub items: Vec<String>,
    pub bonuses: Vec<AppliedBonus>,
}

impl RewardBundle {
    pub fn is_empty(&self) -> bool {
        self.exp == 0 && self.gold == 0 && self.items.is_empty()
    }
}

/// Multiplies `base` by every basis-point factor. Order-independent.
pub fn apply_basis_points(base: u64, factors: impl IntoIterator<Item = u32>) -> u64 {
    let mut numerator = u128::from(base);
    let mut denominator: u128 = 1;
    for bps in factors {
        numerator *= u128::from(bps);
        denominator *= BASIS_POINTS;
        // Keep the product bounded for long bonus lists.
        if denominator >= BASIS_POINTS.pow(3) {
            let g = gcd(numerator, denominator);
            numerator /= g;
            denominator /= g;
        }
    }
    u64::try_from(numerator / denominator).unwrap_or(u64::MAX)
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

/// Bonuses earned by a victory.
pub fn earned_bonuses(
    state: &BattleState,
    context: &RewardContext,
    config: &BattleConfig,
) -> Vec<BonusKind> {
    let summary = &state.summary;
    let mut bonuses = Vec::new();
    if summary.damage_taken == 0 {
        bonuses.push(BonusKind::PerfectVictory);
    }
    if summary.rounds <= config.rewards.speed_bonus_rounds {
        bonuses.push(BonusKind::SpeedBonus);
    }
    if summary.overkill {
        bonuses.push(BonusKind::Overkill);
    }
    if summary.max_combo >= config.rewards.combo_threshold {
        bonuses.push(BonusKind::ComboBonus);
    }
    if context.first_time {
        bonuses.push(BonusKind::FirstTime);
    }
    bonuses
}

/// Computes the rewards of a finished battle.
///
/// Anything but a victory yields an empty bundle and consumes no rolls.
pub fn compute_rewards(
    outcome: Outcome,
    state: &BattleState,
    difficulty: Difficulty,
    context: &RewardContext,
    config: &BattleConfig,
    rng: &mut dyn RandomSource,
) -> RewardBundle {
    if outcome != Outcome::Victory {
        return RewardBundle::default();
    }

    let (mut exp, mut gold) = (0.0_f64, 0.0_f64);
    let mut items = Vec::new();
    for enemy in state.defeated_enemies() {
        let level = f64::from(enemy.level);
        exp += (level * 10.0 + 20.0) * enemy.tier.exp_multiplier();
        gold += (level * 5.0 + 10.0) * enemy.tier.gold_multiplier();
        items.extend(roll_drops(enemy, rng));
    }
    let scale = difficulty.reward_multiplier();
    let base_exp = (exp * scale).floor() as u64;
    let base_gold = (gold * scale).floor() as u64;

    let bonuses = earned_bonuses(state, context, config);
    let exp = apply_basis_points(base_exp, bonuses.iter().map(|b| b.basis_points().0));
    let gold = apply_basis_points(base_gold, bonuses.iter().map(|b| b.basis_points().1));

    tracing::debug!(
        exp,
        gold,
        items = items.len(),
        bonuses = bonuses.len(),
        "rewards computed"
    );

    RewardBundle {
        exp,
        gold,
        items,
        bonuses: bonuses.into_iter().map(AppliedBonus::from).collect(),
    }
}
