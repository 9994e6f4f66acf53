//! Item drop tables.

use crate::env::RandomSource;
use crate::stats::Combatant;

/// One entry of a monster's drop table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropEntry {
    pub item: String,
    /// Independent drop probability in `[0, 1]`.
    pub rate: f64,
}

impl DropEntry {
    pub fn new(item: impl Into<String>, rate: f64) -> Self {
        Self {
            item: item.into(),
            rate,
        }
    }
}

/// Rolls the drops of one defeated enemy.
///
/// One tier-chance roll gates the whole table; on success each entry rolls
/// independently. A boss-class enemy that yields nothing falls back to its
/// single highest-rate entry (first one on ties).
pub fn roll_drops(enemy: &Combatant, rng: &mut dyn RandomSource) -> Vec<String> {
    let mut items = Vec::new();

    if rng.chance(enemy.tier.drop_chance()) {
        for entry in &enemy.drops {
            if rng.chance(entry.rate) {
                items.push(entry.item.clone());
            }
        }
    }

    if items.is_empty() && enemy.tier.is_boss_class() {
        let best = enemy
            .drops
            .iter()
            .reduce(|best, entry| if entry.rate > best.rate { entry } else { best });
        if let Some(entry) = best {
            tracing::debug!(enemy = %enemy.id, item = %entry.item, "guaranteed boss drop");
            items.push(entry.item.clone());
        }
    }

    items
}
