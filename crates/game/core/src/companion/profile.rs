//! Persistent companion data and post-battle growth.

use crate::ability::AbilityId;
use crate::stats::{Combatant, CombatantId, Element, Side, StatKind, Stats};

use super::mood::Mood;

pub const MAX_LOYALTY: u32 = 100;
const LOYALTY_PER_ENEMY: i32 = 2;
const LOYALTY_LOST_ON_DEFEAT: i32 = -5;

/// A companion as it exists between battles.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompanionProfile {
    pub id: String,
    pub name: String,
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    pub base_stats: Stats,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mood: Mood,
    /// 0..=100.
    #[cfg_attr(feature = "serde", serde(default))]
    pub loyalty: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exp: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
}

impl CompanionProfile {
    /// Battle form with mood-adjusted attack, defense and speed at full HP.
    pub fn to_combatant(&self, id: CombatantId) -> Combatant {
        let modifiers = self.mood.modifiers();
        let mut stats = self.base_stats;
        stats.scale(StatKind::Attack, modifiers.attack);
        stats.scale(StatKind::Defense, modifiers.defense);
        stats.scale(StatKind::Speed, modifiers.speed);
        stats.hp = stats.max_hp;

        let mut combatant = Combatant::new(id, self.name.clone(), Side::Companion, stats)
            .with_level(self.level.max(1))
            .with_element(self.element)
            .with_abilities(self.abilities.iter().cloned());
        combatant.mood = Some(self.mood);
        combatant
    }

    /// Applies a reward. Returns the number of levels gained.
    ///
    /// Loyalty is clamped to `0..=100`. A level is gained each time exp
    /// reaches `level * 100`; the threshold is consumed.
    pub fn apply_reward(&mut self, reward: &CompanionReward) -> u32 {
        let loyalty = i64::from(self.loyalty) + i64::from(reward.loyalty_change);
        self.loyalty = loyalty.clamp(0, i64::from(MAX_LOYALTY)) as u32;

        self.exp += reward.exp_gained;
        let mut gained = 0;
        loop {
            let needed = u64::from(self.level.max(1)) * 100;
            if self.exp < needed {
                break;
            }
            self.exp -= needed;
            self.level += 1;
            gained += 1;
        }
        gained
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompanionReward {
    pub exp_gained: u64,
    pub loyalty_change: i32,
}

/// Post-battle growth for a companion.
///
/// Victory: `enemies × (15 + level × 5) × mood exp multiplier` exp and +2
/// loyalty per enemy. Defeat: no exp and -5 loyalty.
pub fn process_companion_rewards(
    profile: &CompanionProfile,
    victory: bool,
    enemies_defeated: u32,
) -> CompanionReward {
    if !victory {
        return CompanionReward {
            exp_gained: 0,
            loyalty_change: LOYALTY_LOST_ON_DEFEAT,
        };
    }

    let per_enemy = 15.0 + f64::from(profile.level) * 5.0;
    let exp = f64::from(enemies_defeated) * per_enemy * profile.mood.modifiers().exp_gain;
    CompanionReward {
        exp_gained: (exp + 1e-9).floor() as u64,
        loyalty_change: LOYALTY_PER_ENEMY.saturating_mul(i32::try_from(enemies_defeated).unwrap_or(i32::MAX)),
    }
}
