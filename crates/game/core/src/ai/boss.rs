//! Multi-phase boss behavior.

use crate::config::BattleConfig;

use super::pattern::{PatternWeights, TargetPriority};

/// One boss phase: entered once HP falls to `hp_threshold` or below.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BossPhase {
    pub index: u8,
    pub hp_threshold: f64,
    pub weights: PatternWeights,
    pub attack_multiplier: f64,
    pub defense_multiplier: f64,
    pub speed_multiplier: f64,
}

pub const BOSS_PHASES: [BossPhase; BattleConfig::MAX_BOSS_PHASES] = [
    BossPhase {
        index: 0,
        hp_threshold: 1.0,
        weights: PatternWeights {
            attack: 60,
            skill: 30,
            defend: 10,
            item: 0,
            target_priority: TargetPriority::HighestDamage,
            skill_usage_threshold: 0.0,
        },
        attack_multiplier: 1.0,
        defense_multiplier: 1.0,
        speed_multiplier: 1.0,
    },
    BossPhase {
        index: 1,
        hp_threshold: 0.75,
        weights: PatternWeights {
            attack: 50,
            skill: 40,
            defend: 10,
            item: 0,
            target_priority: TargetPriority::HighestDamage,
            skill_usage_threshold: 0.0,
        },
        attack_multiplier: 1.1,
        defense_multiplier: 1.0,
        speed_multiplier: 1.1,
    },
    BossPhase {
        index: 2,
        hp_threshold: 0.5,
        weights: PatternWeights {
            attack: 40,
            skill: 55,
            defend: 5,
            item: 0,
            target_priority: TargetPriority::LowestHp,
            skill_usage_threshold: 0.0,
        },
        attack_multiplier: 1.25,
        defense_multiplier: 0.9,
        speed_multiplier: 1.2,
    },
    BossPhase {
        index: 3,
        hp_threshold: 0.25,
        weights: PatternWeights {
            attack: 30,
            skill: 70,
            defend: 0,
            item: 0,
            target_priority: TargetPriority::LowestHp,
            skill_usage_threshold: 0.0,
        },
        attack_multiplier: 1.5,
        defense_multiplier: 0.8,
        speed_multiplier: 1.3,
    },
];

/// Tracks the highest phase a boss has reached. Never moves backwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossPhaseTracker {
    phase: u8,
}

impl BossPhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> u8 {
        self.phase
    }

    pub fn current(&self) -> &'static BossPhase {
        &BOSS_PHASES[usize::from(self.phase).min(BOSS_PHASES.len() - 1)]
    }

    /// Advances to the deepest phase whose threshold `hp_ratio` has reached.
    ///
    /// Returns the new phase when it changed. Healing never lowers the phase.
    pub fn observe(&mut self, hp_ratio: f64) -> Option<&'static BossPhase> {
        let reached = BOSS_PHASES
            .iter()
            .rev()
            .find(|phase| phase.index == 0 || hp_ratio <= phase.hp_threshold)
            .map_or(0, |phase| phase.index);

        if reached > self.phase {
            self.phase = reached;
            Some(self.current())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_advance_at_thresholds() {
        let mut tracker = BossPhaseTracker::new();
        assert_eq!(tracker.observe(1.0), None);
        assert_eq!(tracker.observe(0.8), None);
        assert_eq!(tracker.observe(0.75).map(|p| p.index), Some(1));
        assert_eq!(tracker.observe(0.1).map(|p| p.index), Some(3));
    }

    #[test]
    fn healing_never_regresses() {
        let mut tracker = BossPhaseTracker::new();
        tracker.observe(1.0);
        tracker.observe(0.8);
        tracker.observe(0.6);
        assert_eq!(tracker.index(), 1);
        assert_eq!(tracker.observe(0.9), None);
        assert_eq!(tracker.index(), 1);
    }

    #[test]
    fn later_phases_hit_harder() {
        for pair in BOSS_PHASES.windows(2) {
            assert!(pair[1].attack_multiplier >= pair[0].attack_multiplier);
            assert!(pair[1].hp_threshold < pair[0].hp_threshold);
        }
    }
}
