//! Per-session status effect ledger.
//!
//! One ledger belongs to one [`BattleState`](crate::state::BattleState). It
//! tracks every combatant's timed effects, fires them on the matching tick
//! phase and answers stat-modifier queries.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::stats::{CombatantId, StatKind};

use super::effect::{EffectId, StatusEffect, StatusKind, TickPhase};

type EffectList = ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>;

/// Result of [`StatusLedger::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyOutcome {
    /// A new instance was added.
    Applied(EffectId),
    /// An existing instance had its duration refreshed (and possibly gained a stack).
    Refreshed { id: EffectId, stacks: u8 },
    /// Nothing changed.
    Rejected(RejectReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectReason {
    /// The bearer already carries the maximum number of effects.
    Capacity,
    /// Zero-duration effects are never active.
    ZeroDuration,
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }

    pub fn effect_id(&self) -> Option<EffectId> {
        match self {
            Self::Applied(id) | Self::Refreshed { id, .. } => Some(*id),
            Self::Rejected(_) => None,
        }
    }
}

/// An effect that did something during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiredEffect {
    pub id: EffectId,
    pub kind: StatusKind,
    pub source: CombatantId,
    /// Damage for DoTs, healing for regen, 0 for crowd control.
    pub amount: u32,
}

/// Everything that happened to one combatant during one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub phase: TickPhase,
    pub fired: Vec<FiredEffect>,
    pub expired: Vec<StatusEffect>,
    /// A freeze or stun fired: the bearer loses this turn.
    pub incapacitated: bool,
}

impl TickReport {
    fn new(phase: TickPhase) -> Self {
        Self {
            phase,
            fired: Vec::new(),
            expired: Vec::new(),
            incapacitated: false,
        }
    }

    /// Total damage-over-time dealt by this tick.
    pub fn damage(&self) -> u32 {
        self.fired
            .iter()
            .filter(|f| f.kind.is_damage_over_time())
            .map(|f| f.amount)
            .sum()
    }

    /// Total healing-over-time granted by this tick.
    pub fn healing(&self) -> u32 {
        self.fired
            .iter()
            .filter(|f| f.kind == StatusKind::Regen)
            .map(|f| f.amount)
            .sum()
    }
}

/// Timed buffs, debuffs and DoTs for every combatant of one battle.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLedger {
    effects: BTreeMap<CombatantId, EffectList>,
    next_id: u32,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an effect to a combatant.
    ///
    /// Re-applying an effect that occupies the same slot (same kind and stat)
    /// refreshes its duration instead of adding a duplicate, and adds a stack
    /// while below the effect's `max_stacks`.
    pub fn apply(&mut self, target: CombatantId, effect: StatusEffect) -> ApplyOutcome {
        if effect.duration == 0 {
            return ApplyOutcome::Rejected(RejectReason::ZeroDuration);
        }

        let list = self.effects.entry(target).or_default();

        if let Some(existing) = list.iter_mut().find(|e| e.same_slot(&effect)) {
            existing.duration = effect.duration;
            existing.magnitude = effect.magnitude;
            existing.source = effect.source;
            existing.max_stacks = effect.max_stacks.max(1);
            if existing.stacks < existing.max_stacks {
                existing.stacks += 1;
            }
            return ApplyOutcome::Refreshed {
                id: existing.id,
                stacks: existing.stacks,
            };
        }

        if list.is_full() {
            tracing::warn!(
                "status ledger full for {}: rejected {}",
                target,
                effect.kind
            );
            return ApplyOutcome::Rejected(RejectReason::Capacity);
        }

        self.next_id += 1;
        let id = EffectId(self.next_id);
        list.push(StatusEffect {
            id,
            stacks: 1,
            category: effect.kind.category(),
            max_stacks: effect.max_stacks.max(1),
            ..effect
        });

        ApplyOutcome::Applied(id)
    }

    /// Runs one tick phase for a combatant.
    ///
    /// Every effect whose kind ticks on `phase` fires, then loses exactly one
    /// turn of duration; effects that reach zero are removed immediately.
    /// Effects of the other phase are untouched.
    pub fn tick(&mut self, target: CombatantId, phase: TickPhase) -> TickReport {
        let mut report = TickReport::new(phase);
        let Some(list) = self.effects.get_mut(&target) else {
            return report;
        };

        for effect in list.iter_mut().filter(|e| e.kind.tick_phase() == phase) {
            match effect.kind {
                StatusKind::Poison | StatusKind::Burn | StatusKind::Regen => {
                    report.fired.push(FiredEffect {
                        id: effect.id,
                        kind: effect.kind,
                        source: effect.source,
                        amount: effect.tick_amount(),
                    });
                }
                StatusKind::Freeze | StatusKind::Stun => {
                    report.incapacitated = true;
                    report.fired.push(FiredEffect {
                        id: effect.id,
                        kind: effect.kind,
                        source: effect.source,
                        amount: 0,
                    });
                }
                StatusKind::Buff | StatusKind::Debuff => {}
            }
            effect.duration = effect.duration.saturating_sub(1);
        }

        report
            .expired
            .extend(list.iter().filter(|e| !e.is_active()).copied());
        list.retain(|e| e.is_active());

        report
    }

    /// Combined multiplier for a stat.
    ///
    /// All active modifiers on the stat compound multiplicatively; 1.0 when
    /// none are active.
    pub fn modifier(&self, target: CombatantId, stat: StatKind) -> f64 {
        self.effects(target)
            .iter()
            .filter(|e| e.kind.is_stat_modifier() && e.stat == Some(stat) && e.is_active())
            .map(StatusEffect::stat_multiplier)
            .product()
    }

    /// Active effects on a combatant.
    pub fn effects(&self, target: CombatantId) -> &[StatusEffect] {
        self.effects
            .get(&target)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    pub fn has(&self, target: CombatantId, kind: StatusKind) -> bool {
        self.effects(target).iter().any(|e| e.kind == kind)
    }

    /// True while a freeze or stun is active.
    pub fn is_incapacitated(&self, target: CombatantId) -> bool {
        self.effects(target)
            .iter()
            .any(|e| e.kind.is_incapacitating() && e.is_active())
    }

    /// Removes a single effect instance.
    pub fn remove(&mut self, target: CombatantId, id: EffectId) -> Option<StatusEffect> {
        let list = self.effects.get_mut(&target)?;
        let idx = list.iter().position(|e| e.id == id)?;
        Some(list.remove(idx))
    }

    /// Drops every effect on one combatant.
    pub fn clear(&mut self, target: CombatantId) {
        self.effects.remove(&target);
    }

    /// Drops everything. Called once when the session ends.
    pub fn clear_all(&mut self) {
        self.effects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.effects.values().all(|list| list.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: CombatantId = CombatantId(1);
    const SOURCE: CombatantId = CombatantId(2);

    fn poison(value: f64, duration: u32) -> StatusEffect {
        StatusEffect::new(StatusKind::Poison, value, duration, SOURCE)
    }

    #[test]
    fn poison_fires_three_times_then_expires() {
        let mut ledger = StatusLedger::new();
        assert!(ledger.apply(TARGET, poison(5.0, 3)).is_applied());

        let mut hp = 100u32;
        for remaining in [2, 1, 0] {
            let report = ledger.tick(TARGET, TickPhase::Start);
            hp -= report.damage();
            if remaining > 0 {
                assert_eq!(ledger.effects(TARGET)[0].duration, remaining);
            }
        }

        assert_eq!(hp, 85);
        assert!(!ledger.has(TARGET, StatusKind::Poison));
    }

    #[test]
    fn expiry_is_reported_on_the_last_tick() {
        let mut ledger = StatusLedger::new();
        ledger.apply(TARGET, poison(1.0, 2));

        let first = ledger.tick(TARGET, TickPhase::Start);
        assert!(first.expired.is_empty());
        assert!(ledger.has(TARGET, StatusKind::Poison));

        let second = ledger.tick(TARGET, TickPhase::Start);
        assert_eq!(second.expired.len(), 1);
        assert!(!ledger.has(TARGET, StatusKind::Poison));
    }

    #[test]
    fn end_tick_does_not_touch_start_effects() {
        let mut ledger = StatusLedger::new();
        ledger.apply(TARGET, poison(5.0, 2));

        let report = ledger.tick(TARGET, TickPhase::End);
        assert!(report.fired.is_empty());
        assert_eq!(ledger.effects(TARGET)[0].duration, 2);
    }

    #[test]
    fn buff_decrements_on_end_phase_only() {
        let mut ledger = StatusLedger::new();
        let buff = StatusEffect::new(StatusKind::Buff, 1.5, 1, SOURCE).with_stat(StatKind::Attack);
        ledger.apply(TARGET, buff);

        ledger.tick(TARGET, TickPhase::Start);
        assert_eq!(ledger.modifier(TARGET, StatKind::Attack), 1.5);

        ledger.tick(TARGET, TickPhase::End);
        assert_eq!(ledger.modifier(TARGET, StatKind::Attack), 1.0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn modifiers_compound_multiplicatively() {
        let mut ledger = StatusLedger::new();
        ledger.apply(
            TARGET,
            StatusEffect::new(StatusKind::Buff, 1.5, 3, SOURCE).with_stat(StatKind::Attack),
        );
        ledger.apply(
            TARGET,
            StatusEffect::new(StatusKind::Debuff, 0.5, 3, SOURCE).with_stat(StatKind::Attack),
        );
        ledger.apply(
            TARGET,
            StatusEffect::new(StatusKind::Buff, 2.0, 3, SOURCE).with_stat(StatKind::Defense),
        );

        assert_eq!(ledger.modifier(TARGET, StatKind::Attack), 0.75);
        assert_eq!(ledger.modifier(TARGET, StatKind::Defense), 2.0);
        assert_eq!(ledger.modifier(TARGET, StatKind::Speed), 1.0);
    }

    #[test]
    fn reapply_refreshes_without_duplicating() {
        let mut ledger = StatusLedger::new();
        let first = ledger.apply(TARGET, poison(5.0, 3));
        ledger.tick(TARGET, TickPhase::Start);

        let second = ledger.apply(TARGET, poison(5.0, 3));
        assert_eq!(second.effect_id(), first.effect_id());
        assert_eq!(ledger.effects(TARGET).len(), 1);
        assert_eq!(ledger.effects(TARGET)[0].duration, 3);
        assert_eq!(ledger.effects(TARGET)[0].stacks, 1);
    }

    #[test]
    fn stacking_is_capped_per_effect() {
        let mut ledger = StatusLedger::new();
        let buff = StatusEffect::new(StatusKind::Buff, 1.1, 3, SOURCE)
            .with_stat(StatKind::Attack)
            .with_max_stacks(2);

        ledger.apply(TARGET, buff);
        assert_eq!(
            ledger.apply(TARGET, buff),
            ApplyOutcome::Refreshed {
                id: EffectId(1),
                stacks: 2
            }
        );
        assert_eq!(
            ledger.apply(TARGET, buff),
            ApplyOutcome::Refreshed {
                id: EffectId(1),
                stacks: 2
            }
        );

        let modifier = ledger.modifier(TARGET, StatKind::Attack);
        assert!((modifier - 1.21).abs() < 1e-9);
    }

    #[test]
    fn stacked_dot_scales_damage() {
        let mut ledger = StatusLedger::new();
        let burn = StatusEffect::new(StatusKind::Burn, 4.0, 2, SOURCE).with_max_stacks(3);
        ledger.apply(TARGET, burn);
        ledger.apply(TARGET, burn);

        assert_eq!(ledger.tick(TARGET, TickPhase::Start).damage(), 8);
    }

    #[test]
    fn stun_incapacitates_for_exactly_its_duration() {
        let mut ledger = StatusLedger::new();
        ledger.apply(TARGET, StatusEffect::new(StatusKind::Stun, 0.0, 1, SOURCE));
        assert!(ledger.is_incapacitated(TARGET));

        assert!(ledger.tick(TARGET, TickPhase::Start).incapacitated);
        assert!(!ledger.is_incapacitated(TARGET));
        assert!(!ledger.tick(TARGET, TickPhase::Start).incapacitated);
    }

    #[test]
    fn zero_duration_and_capacity_are_rejected() {
        let mut ledger = StatusLedger::new();
        assert_eq!(
            ledger.apply(TARGET, poison(1.0, 0)),
            ApplyOutcome::Rejected(RejectReason::ZeroDuration)
        );

        let stats = [
            StatKind::MaxHp,
            StatKind::Attack,
            StatKind::Defense,
            StatKind::Speed,
            StatKind::CritRate,
            StatKind::CritDamage,
            StatKind::Dodge,
            StatKind::Accuracy,
        ];
        for stat in stats {
            let buff = StatusEffect::new(StatusKind::Buff, 1.1, 2, SOURCE).with_stat(stat);
            assert!(ledger.apply(TARGET, buff).is_applied());
        }
        assert_eq!(
            ledger.apply(TARGET, poison(1.0, 2)),
            ApplyOutcome::Rejected(RejectReason::Capacity)
        );
    }

    #[test]
    fn clear_is_per_combatant() {
        let mut ledger = StatusLedger::new();
        ledger.apply(TARGET, poison(1.0, 2));
        ledger.apply(SOURCE, poison(1.0, 2));

        ledger.clear(TARGET);
        assert!(ledger.effects(TARGET).is_empty());
        assert_eq!(ledger.effects(SOURCE).len(), 1);

        ledger.clear_all();
        assert!(ledger.is_empty());
    }
}
