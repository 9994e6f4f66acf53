//! Raw ability definitions and the validated, read-only catalog.
//!
//! Content files carry signed, loosely-typed fields so malformed data can be
//! reported precisely. [`AbilityCatalog::from_definitions`] is the only way to
//! turn them into [`Ability`] values.

use std::collections::BTreeMap;

use crate::stats::StatKind;
use crate::status::StatusKind;

use super::errors::CatalogError;
use super::types::{Ability, AbilityId, EffectKind, EffectSpec, EffectTarget, Trigger};

/// Effect discriminant as written in content files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EffectKindTag {
    Damage,
    Heal,
    ApplyStatus,
    Buff,
    Debuff,
    LifeDrain,
    MultiHit,
}

/// Unvalidated effect entry.
///
/// `value` is the primary number of the effect: the power multiplier for
/// damage and life drain, the max-HP ratio for heals, the magnitude for
/// statuses, the stat multiplier for buffs and debuffs, and the hit count for
/// multi-hit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectDefinition {
    pub kind: EffectKindTag,
    pub target: EffectTarget,
    pub value: f64,
    /// Per-hit multiplier for multi-hit (default 1.0).
    #[cfg_attr(feature = "serde", serde(default))]
    pub multiplier: Option<f64>,
    /// Heal ratio for life drain (default 0.5).
    #[cfg_attr(feature = "serde", serde(default))]
    pub ratio: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<StatusKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stat: Option<StatKind>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_stacks: Option<u8>,
}

impl EffectDefinition {
    pub fn new(kind: EffectKindTag, target: EffectTarget, value: f64) -> Self {
        Self {
            kind,
            target,
            value,
            multiplier: None,
            ratio: None,
            duration: 0,
            status: None,
            stat: None,
            max_stacks: None,
        }
    }

    pub fn with_duration(mut self, duration: i32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_status(mut self, status: StatusKind) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_stat(mut self, stat: StatKind) -> Self {
        self.stat = Some(stat);
        self
    }
}

/// Unvalidated ability entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    pub trigger: Trigger,
    #[cfg_attr(feature = "serde", serde(default = "default_chance"))]
    pub chance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: i32,
    pub effects: Vec<EffectDefinition>,
}

#[cfg(feature = "serde")]
fn default_chance() -> f64 {
    1.0
}

const DEFAULT_DRAIN_RATIO: f64 = 0.5;

/// Upper bound on multi-hit strikes per cast.
const MAX_MULTI_HITS: u32 = 10;

impl TryFrom<AbilityDefinition> for Ability {
    type Error = CatalogError;

    fn try_from(def: AbilityDefinition) -> Result<Self, Self::Error> {
        if def.cooldown < 0 {
            return Err(CatalogError::NegativeCooldown {
                ability: def.id,
                cooldown: def.cooldown,
            });
        }
        if !(0.0..=1.0).contains(&def.chance) {
            return Err(CatalogError::ChanceOutOfRange {
                ability: def.id,
                chance: def.chance,
            });
        }
        if def.effects.is_empty() {
            return Err(CatalogError::NoEffects { ability: def.id });
        }

        let effects = def
            .effects
            .iter()
            .enumerate()
            .map(|(index, effect)| validate_effect(&def.id, index, effect))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: def.id,
            name: def.name,
            trigger: def.trigger,
            chance: def.chance,
            cooldown: def.cooldown as u32,
            effects,
        })
    }
}

fn validate_effect(
    ability: &AbilityId,
    index: usize,
    def: &EffectDefinition,
) -> Result<EffectSpec, CatalogError> {
    let invalid = |reason: &'static str| CatalogError::InvalidEffect {
        ability: ability.clone(),
        index,
        reason,
    };
    let missing = |field: &'static str| CatalogError::MissingField {
        ability: ability.clone(),
        index,
        field,
    };

    if def.duration < 0 {
        return Err(CatalogError::NegativeDuration {
            ability: ability.clone(),
            index,
            duration: def.duration,
        });
    }
    let duration = def.duration as u32;
    let max_stacks = def.max_stacks.unwrap_or(1);
    if max_stacks == 0 {
        return Err(invalid("max_stacks must be at least 1"));
    }
    let timed = |duration: u32| {
        if duration == 0 {
            Err(invalid("timed effects need a positive duration"))
        } else {
            Ok(duration)
        }
    };
    let positive = |value: f64, reason: &'static str| {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(invalid(reason))
        }
    };

    let kind = match def.kind {
        EffectKindTag::Damage => EffectKind::Damage {
            multiplier: positive(def.value, "damage multiplier must be positive")?,
        },
        EffectKindTag::Heal => {
            let ratio = positive(def.value, "heal ratio must be positive")?;
            if ratio > 1.0 {
                return Err(invalid("heal ratio must not exceed 1"));
            }
            EffectKind::Heal { ratio }
        }
        EffectKindTag::ApplyStatus => {
            let status = def.status.ok_or_else(|| missing("status"))?;
            if status.is_stat_modifier() && def.stat.is_none() {
                return Err(missing("stat"));
            }
            if !def.value.is_finite() || def.value < 0.0 {
                return Err(invalid("status magnitude must not be negative"));
            }
            EffectKind::ApplyStatus {
                status,
                magnitude: def.value,
                duration: timed(duration)?,
                stat: def.stat,
                max_stacks,
            }
        }
        EffectKindTag::Buff | EffectKindTag::Debuff => {
            let stat = def.stat.ok_or_else(|| missing("stat"))?;
            let multiplier = positive(def.value, "stat multiplier must be positive")?;
            let duration = timed(duration)?;
            if def.kind == EffectKindTag::Buff {
                EffectKind::Buff {
                    stat,
                    multiplier,
                    duration,
                    max_stacks,
                }
            } else {
                EffectKind::Debuff {
                    stat,
                    multiplier,
                    duration,
                    max_stacks,
                }
            }
        }
        EffectKindTag::LifeDrain => {
            let ratio = def.ratio.unwrap_or(DEFAULT_DRAIN_RATIO);
            if !(0.0..=1.0).contains(&ratio) {
                return Err(invalid("drain ratio must be within [0, 1]"));
            }
            EffectKind::LifeDrain {
                multiplier: positive(def.value, "damage multiplier must be positive")?,
                ratio,
            }
        }
        EffectKindTag::MultiHit => {
            if def.value < 1.0
                || def.value > f64::from(MAX_MULTI_HITS)
                || def.value.fract() != 0.0
            {
                return Err(invalid("multi-hit count must be a whole number in 1..=10"));
            }
            EffectKind::MultiHit {
                hits: def.value as u32,
                multiplier: positive(
                    def.multiplier.unwrap_or(1.0),
                    "per-hit multiplier must be positive",
                )?,
            }
        }
    };

    Ok(EffectSpec {
        target: def.target,
        kind,
    })
}

/// Validated, read-only ability content shared by every session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AbilityCatalog {
    abilities: BTreeMap<AbilityId, Ability>,
}

impl AbilityCatalog {
    /// Validates every definition; the first error aborts the whole load.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = AbilityDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for def in definitions {
            catalog.insert(Ability::try_from(def)?)?;
        }
        Ok(catalog)
    }

    /// Adds an already-validated ability.
    pub fn insert(&mut self, ability: Ability) -> Result<(), CatalogError> {
        if self.abilities.contains_key(&ability.id) {
            return Err(CatalogError::DuplicateId(ability.id));
        }
        self.abilities.insert(ability.id.clone(), ability);
        Ok(())
    }

    pub fn get(&self, id: &AbilityId) -> Option<&Ability> {
        self.abilities.get(id)
    }

    pub fn contains(&self, id: &AbilityId) -> bool {
        self.abilities.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.values()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(id: &str) -> AbilityDefinition {
        AbilityDefinition {
            id: id.into(),
            name: id.to_uppercase(),
            trigger: Trigger::Manual,
            chance: 1.0,
            cooldown: 2,
            effects: vec![EffectDefinition::new(
                EffectKindTag::Damage,
                EffectTarget::Enemy,
                1.5,
            )],
        }
    }

    #[test]
    fn valid_definitions_build_a_catalog() {
        let catalog = AbilityCatalog::from_definitions([strike("slash"), strike("bash")])
            .expect("valid content");
        assert_eq!(catalog.len(), 2);
        let slash = catalog.get(&"slash".into()).expect("slash");
        assert_eq!(slash.cooldown, 2);
        assert_eq!(
            slash.effects[0].kind,
            EffectKind::Damage { multiplier: 1.5 }
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = AbilityCatalog::from_definitions([strike("slash"), strike("slash")]);
        assert_eq!(err, Err(CatalogError::DuplicateId("slash".into())));
    }

    #[test]
    fn negative_cooldown_is_rejected() {
        let mut def = strike("slash");
        def.cooldown = -1;
        assert!(matches!(
            Ability::try_from(def),
            Err(CatalogError::NegativeCooldown { cooldown: -1, .. })
        ));
    }

    #[test]
    fn chance_outside_unit_range_is_rejected() {
        for chance in [-0.1, 1.01] {
            let mut def = strike("slash");
            def.chance = chance;
            assert!(matches!(
                Ability::try_from(def),
                Err(CatalogError::ChanceOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn empty_effect_list_is_rejected() {
        let mut def = strike("slash");
        def.effects.clear();
        assert!(matches!(
            Ability::try_from(def),
            Err(CatalogError::NoEffects { .. })
        ));
    }

    #[test]
    fn multi_hit_needs_a_positive_count() {
        for hits in [0.0, -2.0, 1.5, 11.0, 1e12, f64::NAN, f64::INFINITY] {
            let mut def = strike("flurry");
            def.effects = vec![EffectDefinition::new(
                EffectKindTag::MultiHit,
                EffectTarget::Enemy,
                hits,
            )];
            assert!(matches!(
                Ability::try_from(def),
                Err(CatalogError::InvalidEffect { index: 0, .. })
            ));
        }
    }

    #[test]
    fn status_effects_need_their_fields() {
        let mut def = strike("venom");
        def.effects = vec![
            EffectDefinition::new(EffectKindTag::ApplyStatus, EffectTarget::Enemy, 5.0)
                .with_duration(3),
        ];
        assert!(matches!(
            Ability::try_from(def.clone()),
            Err(CatalogError::MissingField { field: "status", .. })
        ));

        def.effects[0].duration = -3;
        def.effects[0].status = Some(StatusKind::Poison);
        assert!(matches!(
            Ability::try_from(def),
            Err(CatalogError::NegativeDuration { duration: -3, .. })
        ));
    }

    #[test]
    fn buffs_need_a_stat_and_positive_multiplier() {
        let mut def = strike("rally");
        def.effects = vec![
            EffectDefinition::new(EffectKindTag::Buff, EffectTarget::Caster, 1.2)
                .with_duration(2),
        ];
        assert!(matches!(
            Ability::try_from(def.clone()),
            Err(CatalogError::MissingField { field: "stat", .. })
        ));

        def.effects[0].stat = Some(StatKind::Attack);
        def.effects[0].value = 0.0;
        assert!(matches!(
            Ability::try_from(def),
            Err(CatalogError::InvalidEffect { .. })
        ));
    }

    #[test]
    fn life_drain_defaults_ratio() {
        let mut def = strike("drain");
        def.effects = vec![EffectDefinition::new(
            EffectKindTag::LifeDrain,
            EffectTarget::Enemy,
            1.0,
        )];
        let ability = Ability::try_from(def).expect("valid drain");
        assert_eq!(
            ability.effects[0].kind,
            EffectKind::LifeDrain {
                multiplier: 1.0,
                ratio: 0.5
            }
        );
    }
}
