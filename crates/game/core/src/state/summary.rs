//! Battle lifecycle and end-of-battle counters.

/// Lifecycle of one battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattlePhase {
    /// Combatants are set up; no action may be taken yet.
    #[default]
    Preparation,
    Battle,
    Victory,
    Defeat,
    Escaped,
}

impl BattlePhase {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::Escaped)
    }

    pub const fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Victory => Some(Outcome::Victory),
            Self::Defeat => Some(Outcome::Defeat),
            Self::Escaped => Some(Outcome::Escaped),
            Self::Preparation | Self::Battle => None,
        }
    }
}

/// Terminal result of a battle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Outcome {
    Victory,
    Defeat,
    Escaped,
}

impl Outcome {
    pub const fn phase(&self) -> BattlePhase {
        match self {
            Self::Victory => BattlePhase::Victory,
            Self::Defeat => BattlePhase::Defeat,
            Self::Escaped => BattlePhase::Escaped,
        }
    }
}

/// Counters accumulated during a battle and read by the reward calculator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSummary {
    /// Completed rounds.
    pub rounds: u32,
    pub actions: u32,
    /// Damage dealt by the player side.
    pub damage_dealt: u64,
    /// Damage taken by the player side, including damage over time.
    pub damage_taken: u64,
    /// Boss phases advanced past, across all bosses.
    pub phases_completed: u32,
    /// Longest run of consecutive player-side hits.
    pub max_combo: u32,
    pub current_combo: u32,
    /// A killing blow dealt at least the overkill ratio of the remaining HP.
    pub overkill: bool,
    pub enemies_defeated: u32,
}

impl BattleSummary {
    pub(crate) fn record_player_hit(&mut self, damage: u32) {
        self.damage_dealt += u64::from(damage);
        self.current_combo += 1;
        self.max_combo = self.max_combo.max(self.current_combo);
    }

    pub(crate) fn record_player_miss(&mut self) {
        self.current_combo = 0;
    }

    /// Taking damage also breaks the combo.
    pub(crate) fn record_damage_taken(&mut self, damage: u32) {
        self.damage_taken += u64::from(damage);
        if damage > 0 {
            self.current_combo = 0;
        }
    }
}
