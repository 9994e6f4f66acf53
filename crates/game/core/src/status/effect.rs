//! Status effect records.

use crate::stats::{CombatantId, StatKind};

/// Unique id of a status effect instance within one ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u32);

/// Types of status effects.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    /// HP loss at the start of each turn.
    Poison,
    /// Fire damage at the start of each turn.
    Burn,

    // ========================================================================
    // Healing over time
    // ========================================================================
    /// HP recovery at the start of each turn.
    Regen,

    // ========================================================================
    // Crowd control (blocks the whole turn)
    // ========================================================================
    Freeze,
    Stun,

    // ========================================================================
    // Stat modifiers
    // ========================================================================
    /// Multiplies a stat by a magnitude above 1.
    Buff,
    /// Multiplies a stat by a magnitude below 1.
    Debuff,
}

/// Whether an effect helps or hurts its bearer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusCategory {
    Buff,
    Debuff,
}

/// The two tick passes of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TickPhase {
    /// Before the bearer acts.
    Start,
    /// After every combatant has acted in a round.
    End,
}

impl StatusKind {
    pub const fn category(&self) -> StatusCategory {
        match self {
            Self::Buff | Self::Regen => StatusCategory::Buff,
            Self::Poison | Self::Burn | Self::Freeze | Self::Stun | Self::Debuff => {
                StatusCategory::Debuff
            }
        }
    }

    /// Phase on which this kind fires and loses one turn of duration.
    pub const fn tick_phase(&self) -> TickPhase {
        match self {
            Self::Buff | Self::Debuff => TickPhase::End,
            Self::Poison | Self::Burn | Self::Regen | Self::Freeze | Self::Stun => {
                TickPhase::Start
            }
        }
    }

    pub const fn is_damage_over_time(&self) -> bool {
        matches!(self, Self::Poison | Self::Burn)
    }

    /// Blocks the bearer's entire turn.
    pub const fn is_incapacitating(&self) -> bool {
        matches!(self, Self::Freeze | Self::Stun)
    }

    pub const fn is_stat_modifier(&self) -> bool {
        matches!(self, Self::Buff | Self::Debuff)
    }
}

/// A single active status effect.
///
/// `magnitude` is per-stack: damage or healing per tick for DoT/regen, a stat
/// multiplier for buff/debuff, unused for crowd control.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub id: EffectId,
    pub kind: StatusKind,
    pub category: StatusCategory,
    pub magnitude: f64,
    pub stat: Option<StatKind>,
    /// Remaining ticks. The effect is active iff this is above zero.
    pub duration: u32,
    pub source: CombatantId,
    pub stacks: u8,
    pub max_stacks: u8,
}

impl StatusEffect {
    /// New single-stack effect. The ledger assigns the instance id on apply.
    pub fn new(kind: StatusKind, magnitude: f64, duration: u32, source: CombatantId) -> Self {
        Self {
            id: EffectId::default(),
            kind,
            category: kind.category(),
            magnitude,
            stat: None,
            duration,
            source,
            stacks: 1,
            max_stacks: 1,
        }
    }

    pub fn with_stat(mut self, stat: StatKind) -> Self {
        self.stat = Some(stat);
        self
    }

    pub fn with_max_stacks(mut self, max_stacks: u8) -> Self {
        self.max_stacks = max_stacks.max(1);
        self
    }

    pub fn is_active(&self) -> bool {
        self.duration > 0
    }

    /// Two instances describe the same effect if kind and stat match.
    pub fn same_slot(&self, other: &StatusEffect) -> bool {
        self.kind == other.kind && self.stat == other.stat
    }

    /// Damage or healing dealt on a tick, across all stacks.
    pub fn tick_amount(&self) -> u32 {
        let total = self.magnitude.max(0.0) * f64::from(self.stacks);
        total.floor() as u32
    }

    /// Stat multiplier across all stacks.
    pub fn stat_multiplier(&self) -> f64 {
        self.magnitude.powi(i32::from(self.stacks))
    }
}
