//! Validated ability model.
//!
//! These types are only built through [`AbilityCatalog`](super::AbilityCatalog),
//! so every numeric field already satisfies its range constraint.

use crate::stats::StatKind;
use crate::status::StatusKind;

/// Stable ability identifier, as written in content files.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(pub String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AbilityId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl core::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Event that may fire an ability.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum Trigger {
    /// Chosen explicitly as a turn action.
    Manual,
    OnTurnStart,
    OnAttack,
    OnCrit,
    OnDamaged,
    /// Guarded: only fires while the caster is at or below half HP.
    OnBelowHalfHp,
    /// Passive that reacts to every event.
    Always,
}

impl Trigger {
    /// Whether an ability with this trigger reacts to `event`.
    pub fn matches(&self, event: Trigger) -> bool {
        *self == Trigger::Always || *self == event
    }
}

/// Who an effect lands on, resolved against the caster at execution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectTarget {
    Caster,
    /// The caster's side: the explicit target if it is allied, else the
    /// player for player-side casters and the caster itself otherwise.
    #[cfg_attr(feature = "serde", serde(alias = "player"))]
    Ally,
    /// Hostile to the caster: the explicit target if it is hostile, else the
    /// first living opponent.
    Enemy,
}

/// What a single effect does.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// One hit through the damage resolver.
    Damage { multiplier: f64 },
    /// Restores a fraction of the target's max HP.
    Heal { ratio: f64 },
    ApplyStatus {
        status: StatusKind,
        magnitude: f64,
        duration: u32,
        stat: Option<StatKind>,
        max_stacks: u8,
    },
    Buff {
        stat: StatKind,
        multiplier: f64,
        duration: u32,
        max_stacks: u8,
    },
    Debuff {
        stat: StatKind,
        multiplier: f64,
        duration: u32,
        max_stacks: u8,
    },
    /// One hit, then heals the caster for `ratio` of the damage dealt.
    LifeDrain { multiplier: f64, ratio: f64 },
    /// `hits` independent resolver calls against the same target.
    MultiHit { hits: u32, multiplier: f64 },
}

impl EffectKind {
    /// True for effects that go through the damage resolver.
    pub fn deals_damage(&self) -> bool {
        matches!(
            self,
            Self::Damage { .. } | Self::LifeDrain { .. } | Self::MultiHit { .. }
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub target: EffectTarget,
    pub kind: EffectKind,
}

/// A validated ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub trigger: Trigger,
    /// Activation probability in `[0, 1]`.
    pub chance: f64,
    /// Rounds before the ability can fire again; 0 means no cooldown.
    pub cooldown: u32,
    /// Never empty.
    pub effects: Vec<EffectSpec>,
}

impl Ability {
    /// Manual abilities are the only ones a controller can pick as an action.
    pub fn is_manual(&self) -> bool {
        self.trigger == Trigger::Manual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_matches_every_event() {
        for event in [Trigger::OnAttack, Trigger::OnCrit, Trigger::OnTurnStart] {
            assert!(Trigger::Always.matches(event));
        }
        assert!(Trigger::OnCrit.matches(Trigger::OnCrit));
        assert!(!Trigger::OnCrit.matches(Trigger::OnAttack));
    }

    #[test]
    fn trigger_names_are_snake_case() {
        assert_eq!(Trigger::OnBelowHalfHp.to_string(), "on_below_half_hp");
        assert_eq!("on_damaged".parse::<Trigger>(), Ok(Trigger::OnDamaged));
    }
}
