//! Ability execution: gating, target resolution and effect dispatch.

use crate::combat::resolve_hit;
use crate::config::BattleConfig;
use crate::env::RandomSource;
use crate::state::{BattleState, LogEntry, LogKind};
use crate::stats::CombatantId;
use crate::status::{ApplyOutcome, StatusEffect, StatusKind};

use super::catalog::AbilityCatalog;
use super::errors::InvalidAction;
use super::types::{Ability, AbilityId, EffectKind, EffectTarget, Trigger};

/// Why an ability call did nothing without being an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    TriggerMismatch,
    OnCooldown { remaining: u32 },
    ChanceFailed,
    /// `OnBelowHalfHp` fired while the caster was above half HP.
    GuardFailed,
}

/// What one effect did to one combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppliedKind {
    Damage { amount: u32, critical: bool },
    Dodged,
    Heal { amount: u32 },
    Status {
        kind: StatusKind,
        outcome: ApplyOutcome,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedEffect {
    pub target: CombatantId,
    pub kind: AppliedKind,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityOutcome {
    pub ability: AbilityId,
    pub success: bool,
    pub skipped: Option<SkipReason>,
    pub effects_applied: Vec<AppliedEffect>,
}

impl AbilityOutcome {
    fn skipped(ability: &AbilityId, reason: SkipReason) -> Self {
        Self {
            ability: ability.clone(),
            success: false,
            skipped: Some(reason),
            effects_applied: Vec::new(),
        }
    }

    /// Total damage dealt by all effects.
    pub fn damage(&self) -> u32 {
        self.effects_applied
            .iter()
            .map(|e| match e.kind {
                AppliedKind::Damage { amount, .. } => amount,
                _ => 0,
            })
            .sum()
    }

    pub fn any_critical(&self) -> bool {
        self.effects_applied
            .iter()
            .any(|e| matches!(e.kind, AppliedKind::Damage { critical: true, .. }))
    }
}

/// Everything an ability needs to run against one battle.
pub struct AbilityContext<'a> {
    pub state: &'a mut BattleState,
    pub catalog: &'a AbilityCatalog,
    pub config: &'a BattleConfig,
    pub rng: &'a mut dyn RandomSource,
}

impl<'a> AbilityContext<'a> {
    pub fn new(
        state: &'a mut BattleState,
        catalog: &'a AbilityCatalog,
        config: &'a BattleConfig,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            state,
            catalog,
            config,
            rng,
        }
    }

    /// Attempts to fire `ability_id` for `caster` in response to `trigger`.
    ///
    /// Hard failures (unknown ability, missing or dead combatants) are
    /// returned as [`InvalidAction`]. Soft failures (trigger mismatch,
    /// cooldown, guard, chance) return `success = false` with the reason and
    /// touch nothing. Abilities with `chance >= 1` never consume a roll.
    ///
    /// On success every effect is applied in declaration order, the cooldown
    /// starts and one `Ability` log entry precedes the effect entries.
    pub fn try_execute(
        &mut self,
        caster: CombatantId,
        ability_id: &AbilityId,
        trigger: Trigger,
        target: Option<CombatantId>,
    ) -> Result<AbilityOutcome, InvalidAction> {
        let catalog = self.catalog;
        let ability = catalog
            .get(ability_id)
            .ok_or_else(|| InvalidAction::UnknownAbility {
                ability: ability_id.clone(),
            })?;

        let caster_ref = self
            .state
            .combatant(caster)
            .ok_or(InvalidAction::UnknownCombatant { id: caster })?;
        if !caster_ref.is_alive() {
            return Err(InvalidAction::ActorCannotAct { actor: caster });
        }
        let below_half = caster_ref.is_below_half();

        if let Some(target) = target {
            let target_ref = self
                .state
                .combatant(target)
                .ok_or(InvalidAction::UnknownCombatant { id: target })?;
            if !target_ref.is_alive() {
                return Err(InvalidAction::DeadTarget { target });
            }
        }

        if let Some(reason) = self.gate(caster, ability, trigger, below_half) {
            tracing::debug!(
                caster = %caster,
                ability = %ability.id,
                reason = %reason,
                "ability skipped"
            );
            return Ok(AbilityOutcome::skipped(&ability.id, reason));
        }

        let round = self.state.round;
        let mut entry = LogEntry::new(round, caster, LogKind::Ability).with_ability(&ability.id);
        if let Some(target) = target {
            entry = entry.with_target(target);
        }
        self.state.log.push(entry);

        let mut applied = Vec::with_capacity(ability.effects.len());
        for spec in &ability.effects {
            let Some(to) = resolve_target(self.state, caster, target, spec.target) else {
                tracing::debug!(ability = %ability.id, "no living target for effect");
                continue;
            };
            self.dispatch(caster, to, &ability.id, spec.kind, &mut applied);
        }

        if ability.cooldown > 0 {
            self.state
                .cooldowns
                .set(caster, &ability.id, ability.cooldown);
        }

        Ok(AbilityOutcome {
            ability: ability.id.clone(),
            success: true,
            skipped: None,
            effects_applied: applied,
        })
    }

    fn gate(
        &mut self,
        caster: CombatantId,
        ability: &Ability,
        trigger: Trigger,
        below_half: bool,
    ) -> Option<SkipReason> {
        if !ability.trigger.matches(trigger) {
            return Some(SkipReason::TriggerMismatch);
        }
        let remaining = self.state.cooldowns.remaining(caster, &ability.id);
        if remaining > 0 {
            return Some(SkipReason::OnCooldown { remaining });
        }
        if ability.trigger == Trigger::OnBelowHalfHp && !below_half {
            return Some(SkipReason::GuardFailed);
        }
        if ability.chance < 1.0 && !self.rng.chance(ability.chance) {
            return Some(SkipReason::ChanceFailed);
        }
        None
    }

    fn dispatch(
        &mut self,
        caster: CombatantId,
        to: CombatantId,
        ability: &AbilityId,
        kind: EffectKind,
        applied: &mut Vec<AppliedEffect>,
    ) {
        match kind {
            EffectKind::Damage { multiplier } => {
                self.strike(caster, to, multiplier, ability, applied);
            }
            EffectKind::Heal { ratio } => {
                let max_hp = self
                    .state
                    .combatant(to)
                    .map_or(0, |c| c.stats.max_hp);
                let amount = (f64::from(max_hp) * ratio).floor() as u32;
                let healed = self.state.restore_hp(caster, to, amount, Some(ability));
                applied.push(AppliedEffect {
                    target: to,
                    kind: AppliedKind::Heal { amount: healed },
                });
            }
            EffectKind::ApplyStatus {
                status,
                magnitude,
                duration,
                stat,
                max_stacks,
            } => {
                let mut effect =
                    StatusEffect::new(status, magnitude, duration, caster).with_max_stacks(max_stacks);
                if let Some(stat) = stat {
                    effect = effect.with_stat(stat);
                }
                self.afflict(caster, to, effect, ability, applied);
            }
            EffectKind::Buff {
                stat,
                multiplier,
                duration,
                max_stacks,
            } => {
                let effect = StatusEffect::new(StatusKind::Buff, multiplier, duration, caster)
                    .with_stat(stat)
                    .with_max_stacks(max_stacks);
                self.afflict(caster, to, effect, ability, applied);
            }
            EffectKind::Debuff {
                stat,
                multiplier,
                duration,
                max_stacks,
            } => {
                let effect = StatusEffect::new(StatusKind::Debuff, multiplier, duration, caster)
                    .with_stat(stat)
                    .with_max_stacks(max_stacks);
                self.afflict(caster, to, effect, ability, applied);
            }
            EffectKind::LifeDrain { multiplier, ratio } => {
                let dealt = self.strike(caster, to, multiplier, ability, applied);
                let drained = (f64::from(dealt) * ratio).floor() as u32;
                if drained > 0 {
                    let healed = self.state.restore_hp(caster, caster, drained, Some(ability));
                    applied.push(AppliedEffect {
                        target: caster,
                        kind: AppliedKind::Heal { amount: healed },
                    });
                }
            }
            EffectKind::MultiHit { hits, multiplier } => {
                for _ in 0..hits {
                    if !self.state.is_alive(to) {
                        break;
                    }
                    self.strike(caster, to, multiplier, ability, applied);
                }
            }
        }
    }

    /// One damage-resolver call. Returns the HP actually removed.
    fn strike(
        &mut self,
        caster: CombatantId,
        to: CombatantId,
        multiplier: f64,
        ability: &AbilityId,
        applied: &mut Vec<AppliedEffect>,
    ) -> u32 {
        if !self.state.is_alive(to) {
            return 0;
        }
        let (Some(attacker), Some(defender)) = (self.state.snapshot(caster), self.state.snapshot(to))
        else {
            return 0;
        };

        let result = resolve_hit(&attacker, &defender, None, multiplier, self.config, &mut *self.rng);
        let dealt = self
            .state
            .apply_hit(caster, to, &result, Some(ability), self.config);

        let kind = if result.hit {
            AppliedKind::Damage {
                amount: dealt,
                critical: result.critical,
            }
        } else {
            AppliedKind::Dodged
        };
        applied.push(AppliedEffect { target: to, kind });
        dealt
    }

    fn afflict(
        &mut self,
        caster: CombatantId,
        to: CombatantId,
        effect: StatusEffect,
        ability: &AbilityId,
        applied: &mut Vec<AppliedEffect>,
    ) {
        let kind = effect.kind;
        let outcome = self.state.apply_status(caster, to, effect, Some(ability));
        applied.push(AppliedEffect {
            target: to,
            kind: AppliedKind::Status { kind, outcome },
        });
    }
}

/// Resolves an effect target relative to the caster and the explicit target.
///
/// `Ally` and `Enemy` are read from the caster's side, so a monster's
/// `Enemy` effect lands on the player side.
pub fn resolve_target(
    state: &BattleState,
    caster: CombatantId,
    explicit: Option<CombatantId>,
    target: EffectTarget,
) -> Option<CombatantId> {
    let side = state.combatant(caster)?.side;
    let living_with = |id: CombatantId, hostile: bool| {
        state
            .combatant(id)
            .is_some_and(|c| c.is_alive() && side.is_hostile_to(c.side) == hostile)
    };
    let first_living = |hostile: bool| {
        state
            .living()
            .find(|c| side.is_hostile_to(c.side) == hostile)
            .map(|c| c.id)
    };

    match target {
        EffectTarget::Caster => state.is_alive(caster).then_some(caster),
        EffectTarget::Ally => {
            let leader = if side.is_player_side() {
                CombatantId::PLAYER
            } else {
                caster
            };
            explicit
                .filter(|id| living_with(*id, false))
                .or_else(|| living_with(leader, false).then_some(leader))
                .or_else(|| first_living(false))
        }
        EffectTarget::Enemy => explicit
            .filter(|id| living_with(*id, true))
            .or_else(|| first_living(true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityDefinition, EffectDefinition, EffectKindTag};
    use crate::env::ScriptedRng;
    use crate::stats::{Combatant, Side, StatKind, Stats};

    const HIT: f64 = 0.0;
    const NO_CRIT: f64 = 0.999;
    const NO_JITTER: f64 = 0.5;

    fn catalog() -> AbilityCatalog {
        let def = |id: &str, trigger, chance, cooldown, effects| AbilityDefinition {
            id: AbilityId::from(id),
            name: id.into(),
            trigger,
            chance,
            cooldown,
            effects,
        };
        AbilityCatalog::from_definitions([
            def(
                "power_strike",
                Trigger::Manual,
                1.0,
                2,
                vec![EffectDefinition::new(EffectKindTag::Damage, EffectTarget::Enemy, 2.0)],
            ),
            def(
                "triple_jab",
                Trigger::Manual,
                1.0,
                0,
                vec![EffectDefinition::new(EffectKindTag::MultiHit, EffectTarget::Enemy, 3.0)],
            ),
            def(
                "second_wind",
                Trigger::OnBelowHalfHp,
                1.0,
                3,
                vec![EffectDefinition::new(EffectKindTag::Heal, EffectTarget::Caster, 0.25)],
            ),
            def(
                "lucky_shot",
                Trigger::OnAttack,
                0.5,
                0,
                vec![EffectDefinition::new(EffectKindTag::Damage, EffectTarget::Enemy, 1.0)],
            ),
            def(
                "war_cry",
                Trigger::Always,
                1.0,
                1,
                vec![
                    EffectDefinition::new(EffectKindTag::Buff, EffectTarget::Caster, 1.5)
                        .with_stat(StatKind::Attack)
                        .with_duration(2),
                    EffectDefinition::new(EffectKindTag::ApplyStatus, EffectTarget::Enemy, 4.0)
                        .with_status(StatusKind::Poison)
                        .with_duration(3),
                ],
            ),
            def(
                "vampiric_bite",
                Trigger::Manual,
                1.0,
                0,
                vec![EffectDefinition::new(EffectKindTag::LifeDrain, EffectTarget::Enemy, 1.0)],
            ),
        ])
        .expect("test catalog")
    }

    fn state() -> BattleState {
        let hero = Combatant::new(
            CombatantId::PLAYER,
            "Hero",
            Side::Player,
            Stats {
                attack: 50,
                ..Stats::default()
            },
        );
        let slime = Combatant::new(
            CombatantId(1),
            "Slime",
            Side::Enemy,
            Stats {
                defense: 10,
                ..Stats::default()
            },
        );
        BattleState::new([hero, slime])
    }

    #[test]
    fn damage_ability_hits_and_starts_cooldown() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let mut state = state();
        let mut rng = ScriptedRng::new([HIT, NO_CRIT, NO_JITTER]);
        let mut ctx = AbilityContext::new(&mut state, &catalog, &config, &mut rng);

        let outcome = ctx
            .try_execute(CombatantId::PLAYER, &"power_strike".into(), Trigger::Manual, None)
            .expect("valid call");

        assert!(outcome.success);
        // 50 × 2 - 10 × 0.5 = 95
        assert_eq!(outcome.damage(), 95);
        assert_eq!(state.cooldowns.remaining(CombatantId::PLAYER, &"power_strike".into()), 2);
        assert_eq!(state.combatant(CombatantId(1)).map(|c| c.stats.hp), Some(5));
    }

    #[test]
    fn cooldown_skips_without_rolling() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let mut state = state();
        state
            .cooldowns
            .set(CombatantId::PLAYER, &"power_strike".into(), 1);
        let mut rng = ScriptedRng::new([HIT]);
        let mut ctx = AbilityContext::new(&mut state, &catalog, &config, &mut rng);

        let outcome = ctx
            .try_execute(CombatantId::PLAYER, &"power_strike".into(), Trigger::Manual, None)
            .expect("valid call");

        assert!(!outcome.success);
        assert_eq!(outcome.skipped, Some(SkipReason::OnCooldown { remaining: 1 }));
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn unknown_ability_and_dead_target_are_errors() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let mut state = state();
        if let Some(slime) = state.combatant_mut(CombatantId(1)) {
            slime.stats.hp = 0;
        }
        let mut rng = ScriptedRng::constant(0.0);
        let mut ctx = AbilityContext::new(&mut state, &catalog, &config, &mut rng);

        assert!(matches!(
            ctx.try_execute(CombatantId::PLAYER, &"meteor".into(), Trigger::Manual, None),
            Err(InvalidAction::UnknownAbility { .. })
        ));
        assert_eq!(
            ctx.try_execute(
                CombatantId::PLAYER,
                &"power_strike".into(),
                Trigger::Manual,
                Some(CombatantId(1))
            ),
            Err(InvalidAction::DeadTarget {
                target: CombatantId(1)
            })
        );
    }

    #[test]
    fn trigger_mismatch_and_guard_are_silent() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let mut state = state();
        let mut rng = ScriptedRng::constant(0.0);
        let mut ctx = AbilityContext::new(&mut state, &catalog, &config, &mut rng);

        let mismatch = ctx
            .try_execute(CombatantId::PLAYER, &"power_strike".into(), Trigger::OnCrit, None)
            .expect("valid call");
        assert_eq!(mismatch.skipped, Some(SkipReason::TriggerMismatch));

        let guarded = ctx
            .try_execute(
                CombatantId::PLAYER,
                &"second_wind".into(),
                Trigger::OnBelowHalfHp,
                None,
            )
            .expect("valid call");
        assert_eq!(guarded.skipped, Some(SkipReason::GuardFailed));
    }

    #[test]
    fn guard_passes_at_half_hp() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let mut state = state();
        if let Some(hero) = state.combatant_mut(CombatantId::PLAYER) {
            hero.stats.hp = 50;
        }
        let mut rng = ScriptedRng::constant(0.0);
        let mut ctx = AbilityContext::new(&mut state, &catalog, &config, &mut rng);

        let outcome = ctx
            .try_execute(
                CombatantId::PLAYER,
                &"second_wind".into(),
                Trigger::OnBelowHalfHp,
                None,
            )
            .expect("valid call");
        assert!(outcome.success);
        assert_eq!(state.combatant(CombatantId::PLAYER).map(|c| c.stats.hp), Some(75));
    }

    #[test]
    fn chance_roll_gates_activation() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let mut state = state();
        let mut rng = ScriptedRng::new([0.7]);
        let mut ctx = AbilityContext::new(&mut state, &catalog, &config, &mut rng);

        let outcome = ctx
            .try_execute(CombatantId::PLAYER, &"lucky_shot".into(), Trigger::OnAttack, None)
            .expect("valid call");
        assert_eq!(outcome.skipped, Some(SkipReason::ChanceFailed));
    }

    #[test]
    fn multi_hit_rolls_each_strike() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let mut state = state();
        if let Some(slime) = state.combatant_mut(CombatantId(1)) {
            slime.stats.max_hp = 500;
            slime.stats.hp = 500;
        }
        // hit, miss, hit
        let mut rng = ScriptedRng::new([
            HIT, NO_CRIT, NO_JITTER, 0.99, HIT, NO_CRIT, NO_JITTER,
        ]);
        let mut ctx = AbilityContext::new(&mut state, &catalog, &config, &mut rng);

        let outcome = ctx
            .try_execute(CombatantId::PLAYER, &"triple_jab".into(), Trigger::Manual, None)
            .expect("valid call");

        assert_eq!(outcome.effects_applied.len(), 3);
        assert_eq!(outcome.effects_applied[1].kind, AppliedKind::Dodged);
        assert_eq!(outcome.damage(), 90);
    }

    #[test]
    fn always_trigger_applies_buff_and_poison() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let mut state = state();
        let mut rng = ScriptedRng::constant(0.0);
        let mut ctx = AbilityContext::new(&mut state, &catalog, &config, &mut rng);

        let outcome = ctx
            .try_execute(CombatantId::PLAYER, &"war_cry".into(), Trigger::OnDamaged, None)
            .expect("valid call");

        assert!(outcome.success);
        assert_eq!(state.ledger.modifier(CombatantId::PLAYER, StatKind::Attack), 1.5);
        assert!(state.ledger.has(CombatantId(1), StatusKind::Poison));
    }

    #[test]
    fn life_drain_heals_the_caster() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let mut state = state();
        if let Some(hero) = state.combatant_mut(CombatantId::PLAYER) {
            hero.stats.hp = 10;
        }
        let mut rng = ScriptedRng::new([HIT, NO_CRIT, NO_JITTER]);
        let mut ctx = AbilityContext::new(&mut state, &catalog, &config, &mut rng);

        ctx.try_execute(CombatantId::PLAYER, &"vampiric_bite".into(), Trigger::Manual, None)
            .expect("valid call");

        // 45 dealt, half drained
        assert_eq!(state.combatant(CombatantId::PLAYER).map(|c| c.stats.hp), Some(32));
    }

    #[test]
    fn effect_targets_are_relative_to_the_caster() {
        let state = state();
        assert_eq!(
            resolve_target(&state, CombatantId(1), Some(CombatantId::PLAYER), EffectTarget::Enemy),
            Some(CombatantId::PLAYER)
        );
        assert_eq!(
            resolve_target(&state, CombatantId(1), None, EffectTarget::Enemy),
            Some(CombatantId::PLAYER)
        );
        assert_eq!(
            resolve_target(&state, CombatantId::PLAYER, Some(CombatantId::PLAYER), EffectTarget::Enemy),
            Some(CombatantId(1))
        );
        assert_eq!(
            resolve_target(&state, CombatantId(1), Some(CombatantId::PLAYER), EffectTarget::Ally),
            Some(CombatantId(1))
        );
        assert_eq!(
            resolve_target(&state, CombatantId::PLAYER, Some(CombatantId(1)), EffectTarget::Ally),
            Some(CombatantId::PLAYER)
        );
        assert_eq!(
            resolve_target(&state, CombatantId(1), None, EffectTarget::Caster),
            Some(CombatantId(1))
        );
    }

    #[test]
    fn enemy_skill_lands_on_the_player() {
        let catalog = catalog();
        let config = BattleConfig::default();
        let mut state = state();
        let mut rng = ScriptedRng::constant(0.0);
        let mut ctx = AbilityContext::new(&mut state, &catalog, &config, &mut rng);

        let outcome = ctx
            .try_execute(CombatantId(1), &"war_cry".into(), Trigger::Manual, Some(CombatantId::PLAYER))
            .expect("valid call");

        assert!(outcome.success);
        assert!(state.ledger.has(CombatantId::PLAYER, StatusKind::Poison));
        assert!(!state.ledger.has(CombatantId(1), StatusKind::Poison));
        assert_eq!(state.ledger.modifier(CombatantId(1), StatKind::Attack), 1.5);
    }
}
