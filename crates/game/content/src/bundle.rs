//! Validated, shareable content tables.

use std::collections::BTreeMap;

use battle_core::{
    AbilityCatalog, AbilityId, BattleConfig, Combatant, CombatantDefinition, CombatantId,
    CompanionProfile, Difficulty, Side,
};

/// Monster table entry. Same shape as any other combatant definition.
pub type MonsterDefinition = CombatantDefinition;

/// Cross-table consistency problems.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("duplicate monster id '{0}'")]
    DuplicateMonster(String),

    #[error("duplicate companion id '{0}'")]
    DuplicateCompanion(String),

    #[error("'{owner}' references unknown ability '{ability}'")]
    UnknownAbility { owner: String, ability: AbilityId },

    #[error("'{monster}' drops '{item}' at rate {rate}, outside [0, 1]")]
    DropRateOutOfRange {
        monster: String,
        item: String,
        rate: f64,
    },

    #[error("'{owner}' has level 0")]
    ZeroLevel { owner: String },

    #[error("companion '{companion}' has loyalty {loyalty}, above 100")]
    LoyaltyOutOfRange { companion: String, loyalty: u32 },
}

/// Everything a battle session reads from content.
#[derive(Clone, Debug, Default)]
pub struct ContentBundle {
    catalog: AbilityCatalog,
    monsters: BTreeMap<String, MonsterDefinition>,
    companions: BTreeMap<String, CompanionProfile>,
    config: BattleConfig,
}

impl ContentBundle {
    /// Assembles and cross-checks the tables.
    pub fn new(
        catalog: AbilityCatalog,
        monsters: impl IntoIterator<Item = MonsterDefinition>,
        companions: impl IntoIterator<Item = CompanionProfile>,
        config: BattleConfig,
    ) -> Result<Self, ContentError> {
        let mut monster_table = BTreeMap::new();
        for monster in monsters {
            validate_monster(&monster, &catalog)?;
            if monster_table.contains_key(&monster.id) {
                return Err(ContentError::DuplicateMonster(monster.id));
            }
            monster_table.insert(monster.id.clone(), monster);
        }

        let mut companion_table = BTreeMap::new();
        for companion in companions {
            validate_companion(&companion, &catalog)?;
            if companion_table.contains_key(&companion.id) {
                return Err(ContentError::DuplicateCompanion(companion.id));
            }
            companion_table.insert(companion.id.clone(), companion);
        }

        tracing::debug!(
            abilities = catalog.len(),
            monsters = monster_table.len(),
            companions = companion_table.len(),
            "content bundle assembled"
        );

        Ok(Self {
            catalog,
            monsters: monster_table,
            companions: companion_table,
            config,
        })
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn monster(&self, id: &str) -> Option<&MonsterDefinition> {
        self.monsters.get(id)
    }

    pub fn monsters(&self) -> impl Iterator<Item = &MonsterDefinition> {
        self.monsters.values()
    }

    pub fn companion(&self, id: &str) -> Option<&CompanionProfile> {
        self.companions.get(id)
    }

    pub fn companions(&self) -> impl Iterator<Item = &CompanionProfile> {
        self.companions.values()
    }

    /// Builds an enemy combatant, tier-scaled and then pre-scaled by
    /// difficulty.
    pub fn spawn_monster(
        &self,
        id: &str,
        combatant: CombatantId,
        difficulty: Difficulty,
    ) -> Option<Combatant> {
        let def = self.monster(id)?;
        let mut enemy = Combatant::from_definition(combatant, Side::Enemy, def);
        enemy.prescale(difficulty.stat_multiplier());
        Some(enemy)
    }
}

fn validate_monster(monster: &MonsterDefinition, catalog: &AbilityCatalog) -> Result<(), ContentError> {
    if monster.level == 0 {
        return Err(ContentError::ZeroLevel {
            owner: monster.id.clone(),
        });
    }
    check_abilities(&monster.id, &monster.abilities, catalog)?;
    for drop in &monster.drops {
        if !(0.0..=1.0).contains(&drop.rate) {
            return Err(ContentError::DropRateOutOfRange {
                monster: monster.id.clone(),
                item: drop.item.clone(),
                rate: drop.rate,
            });
        }
    }
    Ok(())
}

fn validate_companion(
    companion: &CompanionProfile,
    catalog: &AbilityCatalog,
) -> Result<(), ContentError> {
    if companion.level == 0 {
        return Err(ContentError::ZeroLevel {
            owner: companion.id.clone(),
        });
    }
    if companion.loyalty > battle_core::companion::MAX_LOYALTY {
        return Err(ContentError::LoyaltyOutOfRange {
            companion: companion.id.clone(),
            loyalty: companion.loyalty,
        });
    }
    check_abilities(&companion.id, &companion.abilities, catalog)
}

fn check_abilities(
    owner: &str,
    abilities: &[AbilityId],
    catalog: &AbilityCatalog,
) -> Result<(), ContentError> {
    match abilities.iter().find(|id| !catalog.contains(id)) {
        Some(missing) => Err(ContentError::UnknownAbility {
            owner: owner.to_string(),
            ability: missing.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{DropEntry, Stats, Tier};

    fn monster(id: &str) -> MonsterDefinition {
        MonsterDefinition {
            id: id.into(),
            name: id.into(),
            level: 3,
            tier: Tier::Elite,
            element: Default::default(),
            base_stats: Stats {
                max_hp: 100,
                attack: 20,
                defense: 10,
                ..Stats::default()
            },
            ai_pattern: None,
            abilities: Vec::new(),
            items: 0,
            drops: Vec::new(),
        }
    }

    #[test]
    fn unknown_ability_is_rejected() {
        let mut orc = monster("orc");
        orc.abilities.push("fireball".into());
        let err = ContentBundle::new(
            AbilityCatalog::default(),
            [orc],
            [],
            BattleConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::UnknownAbility { .. }));
    }

    #[test]
    fn drop_rate_must_be_a_probability() {
        let mut orc = monster("orc");
        orc.drops.push(DropEntry::new("tusk", 1.5));
        let err = ContentBundle::new(
            AbilityCatalog::default(),
            [orc],
            [],
            BattleConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::DropRateOutOfRange { .. }));
    }

    #[test]
    fn duplicate_monsters_are_rejected() {
        let err = ContentBundle::new(
            AbilityCatalog::default(),
            [monster("orc"), monster("orc")],
            [],
            BattleConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, ContentError::DuplicateMonster("orc".into()));
    }

    #[test]
    fn spawned_monsters_are_tier_and_difficulty_scaled() {
        let bundle = ContentBundle::new(
            AbilityCatalog::default(),
            [monster("orc")],
            [],
            BattleConfig::default(),
        )
        .unwrap();
        let orc = bundle
            .spawn_monster("orc", CombatantId(1), Difficulty::Hard)
            .unwrap();
        // elite: hp ×1.5, attack ×1.2; hard: ×1.2 on top
        assert_eq!(orc.stats.max_hp, 180);
        assert_eq!(orc.stats.hp, 180);
        assert_eq!(orc.stats.attack, 28);
        assert_eq!(orc.side, Side::Enemy);
        assert!(bundle.spawn_monster("dragon", CombatantId(2), Difficulty::Hard).is_none());
    }
}
