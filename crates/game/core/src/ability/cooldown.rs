//! Per-session ability cooldowns.

use std::collections::BTreeMap;

use crate::stats::CombatantId;

use super::types::AbilityId;

/// Remaining cooldown rounds keyed by `(combatant, ability)`.
///
/// Owned by one battle; entries that reach zero are dropped, so an absent key
/// means "ready".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownTracker {
    remaining: BTreeMap<(CombatantId, AbilityId), u32>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) a cooldown. Setting 0 clears it.
    pub fn set(&mut self, combatant: CombatantId, ability: &AbilityId, rounds: u32) {
        let key = (combatant, ability.clone());
        if rounds == 0 {
            self.remaining.remove(&key);
        } else {
            self.remaining.insert(key, rounds);
        }
    }

    pub fn remaining(&self, combatant: CombatantId, ability: &AbilityId) -> u32 {
        self.remaining
            .get(&(combatant, ability.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_ready(&self, combatant: CombatantId, ability: &AbilityId) -> bool {
        self.remaining(combatant, ability) == 0
    }

    /// Decrements every entry by exactly one.
    pub fn tick(&mut self) {
        self.remaining.retain(|_, rounds| {
            *rounds = rounds.saturating_sub(1);
            *rounds > 0
        });
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}
