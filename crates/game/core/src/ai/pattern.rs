//! Behavior profiles and their static weight tables.

/// Behavior profile of an AI-controlled combatant.
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
pub enum AiPattern {
    Aggressive,
    Defensive,
    #[default]
    Balanced,
    Cunning,
    Berserker,
    /// Weights come from the current [`BossPhase`](super::BossPhase).
    Boss,
}

/// How an AI picks among living opponents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TargetPriority {
    /// Lowest current HP, ties by id.
    LowestHp,
    /// Highest effective attack, ties by id.
    HighestDamage,
    Random,
}

/// Relative action weights plus targeting and skill gating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternWeights {
    pub attack: u32,
    pub skill: u32,
    pub defend: u32,
    pub item: u32,
    pub target_priority: TargetPriority,
    /// Skills are only used while `hp_ratio >= skill_usage_threshold`.
    pub skill_usage_threshold: f64,
}

impl PatternWeights {
    pub const fn total(&self) -> u32 {
        self.attack + self.skill + self.defend + self.item
    }
}

impl AiPattern {
    pub const fn weights(&self) -> PatternWeights {
        match self {
            Self::Aggressive => PatternWeights {
                attack: 70,
                skill: 25,
                defend: 0,
                item: 5,
                target_priority: TargetPriority::LowestHp,
                skill_usage_threshold: 0.0,
            },
            Self::Defensive => PatternWeights {
                attack: 40,
                skill: 20,
                defend: 30,
                item: 10,
                target_priority: TargetPriority::HighestDamage,
                skill_usage_threshold: 0.5,
            },
            Self::Balanced => PatternWeights {
                attack: 55,
                skill: 25,
                defend: 10,
                item: 10,
                target_priority: TargetPriority::Random,
                skill_usage_threshold: 0.3,
            },
            Self::Cunning => PatternWeights {
                attack: 45,
                skill: 40,
                defend: 5,
                item: 10,
                target_priority: TargetPriority::LowestHp,
                skill_usage_threshold: 0.2,
            },
            Self::Berserker => PatternWeights {
                attack: 80,
                skill: 20,
                defend: 0,
                item: 0,
                target_priority: TargetPriority::Random,
                skill_usage_threshold: 0.0,
            },
            Self::Boss => super::boss::BOSS_PHASES[0].weights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_pattern_has_positive_total_weight() {
        for pattern in AiPattern::iter() {
            assert!(pattern.weights().total() > 0, "{pattern}");
        }
    }

    #[test]
    fn berserker_never_defends() {
        let w = AiPattern::Berserker.weights();
        assert_eq!(w.defend, 0);
        assert_eq!(w.item, 0);
    }
}
