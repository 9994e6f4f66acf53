//! Battle state.
//!
//! [`BattleState`] exclusively owns everything mutable about one battle: the
//! combatants, the status ledger, cooldowns, boss phase trackers, escape
//! bookkeeping, the combat log and the summary counters. Dropping it ends the
//! session; nothing outlives it.

mod log;
mod summary;
mod turn;

use std::collections::BTreeMap;

use crate::ability::{AbilityCatalog, AbilityId, CooldownTracker};
use crate::ai::{AiPattern, BattleContext, BossPhase, BossPhaseTracker, TargetInfo};
use crate::combat::{CombatSnapshot, HitResult};
use crate::config::BattleConfig;
use crate::engine::EscapeTracker;
use crate::stats::{Combatant, CombatantId, Side, StatKind};
use crate::status::{ApplyOutcome, StatusEffect, StatusLedger};

pub use log::{CombatLog, LogEntry, LogKind};
pub use summary::{BattlePhase, BattleSummary, Outcome};
pub use turn::TurnState;

#[derive(Clone, Debug)]
pub struct BattleState {
    pub phase: BattlePhase,
    /// Current round, starting at 1 once the battle begins.
    pub round: u32,
    /// Ordered by id.
    combatants: Vec<Combatant>,
    pub ledger: StatusLedger,
    pub cooldowns: CooldownTracker,
    pub boss_phases: BTreeMap<CombatantId, BossPhaseTracker>,
    pub escape: EscapeTracker,
    pub log: CombatLog,
    pub summary: BattleSummary,
    pub turn: TurnState,
}

impl BattleState {
    /// Creates a battle in the preparation phase.
    ///
    /// Combatants are sorted by id. Every combatant with the boss AI pattern
    /// gets a phase tracker.
    pub fn new(combatants: impl IntoIterator<Item = Combatant>) -> Self {
        let mut combatants: Vec<Combatant> = combatants.into_iter().collect();
        combatants.sort_by_key(|c| c.id);
        debug_assert!(
            combatants.windows(2).all(|w| w[0].id != w[1].id),
            "combatant ids must be unique"
        );

        let boss_phases = combatants
            .iter()
            .filter(|c| c.ai_pattern == Some(AiPattern::Boss))
            .map(|c| (c.id, BossPhaseTracker::new()))
            .collect();

        Self {
            phase: BattlePhase::Preparation,
            round: 0,
            combatants,
            ledger: StatusLedger::new(),
            cooldowns: CooldownTracker::new(),
            boss_phases,
            escape: EscapeTracker::default(),
            log: CombatLog::new(),
            summary: BattleSummary::default(),
            turn: TurnState::new(),
        }
    }

    // ===== queries =====

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|idx| &self.combatants[idx])
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|idx| &mut self.combatants[idx])
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.combatant(id).is_some_and(Combatant::is_alive)
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.combatant(CombatantId::PLAYER)
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.side == Side::Enemy)
    }

    pub fn living_enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.enemies().filter(|c| c.is_alive())
    }

    /// Living combatants hostile to `side`.
    pub fn opponents_of(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.living().filter(move |c| c.side.is_hostile_to(side))
    }

    pub fn defeated_enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.enemies().filter(|c| !c.is_alive())
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.phase.outcome()
    }

    /// Current boss phase of a combatant, if it has a tracker.
    pub fn boss_phase(&self, id: CombatantId) -> Option<&'static BossPhase> {
        self.boss_phases.get(&id).map(BossPhaseTracker::current)
    }

    /// Manual abilities of `actor` that are off cooldown, in list order.
    pub fn ready_skills(&self, actor: CombatantId, catalog: &AbilityCatalog) -> Vec<AbilityId> {
        let Some(combatant) = self.combatant(actor) else {
            return Vec::new();
        };
        combatant
            .abilities
            .iter()
            .filter(|id| catalog.get(id).is_some_and(|a| a.is_manual()))
            .filter(|id| self.cooldowns.is_ready(actor, id))
            .cloned()
            .collect()
    }

    /// Living opponents, ready skills and boss phase as seen by `actor`.
    pub fn battle_context(&self, actor: CombatantId, catalog: &AbilityCatalog) -> BattleContext {
        let Some(side) = self.combatant(actor).map(|c| c.side) else {
            return BattleContext::default();
        };
        let opponents = self
            .opponents_of(side)
            .map(|c| TargetInfo {
                id: c.id,
                hp: c.stats.hp,
                attack: self.snapshot(c.id).map_or(c.stats.attack, |s| s.stats.attack),
            })
            .collect();

        BattleContext {
            opponents,
            ready_skills: self.ready_skills(actor, catalog),
            boss_phase: self.boss_phase(actor),
        }
    }

    /// Effective stats at this instant: base stats, then status modifiers,
    /// then boss phase multipliers.
    pub fn snapshot(&self, id: CombatantId) -> Option<CombatSnapshot> {
        let combatant = self.combatant(id)?;
        let mut snapshot = CombatSnapshot::of(combatant);

        for kind in [
            StatKind::Attack,
            StatKind::Defense,
            StatKind::Speed,
            StatKind::CritRate,
            StatKind::CritDamage,
            StatKind::Dodge,
            StatKind::Accuracy,
        ] {
            let modifier = self.ledger.modifier(id, kind);
            if modifier != 1.0 {
                snapshot.stats.scale(kind, modifier);
            }
        }

        if let Some(phase) = self.boss_phase(id) {
            snapshot.stats.scale(StatKind::Attack, phase.attack_multiplier);
            snapshot.stats.scale(StatKind::Defense, phase.defense_multiplier);
            snapshot.stats.scale(StatKind::Speed, phase.speed_multiplier);
        }

        Some(snapshot)
    }

    pub fn effective_speed(&self, id: CombatantId) -> u32 {
        self.snapshot(id).map_or(0, |s| s.stats.speed)
    }

    // ===== mutations shared by actions, abilities and companions =====

    /// Applies a resolved hit: subtracts HP, updates the summary and logs.
    ///
    /// Returns the HP actually removed.
    pub fn apply_hit(
        &mut self,
        attacker: CombatantId,
        defender: CombatantId,
        result: &HitResult,
        ability: Option<&AbilityId>,
        config: &BattleConfig,
    ) -> u32 {
        let round = self.round;
        let attacker_side = self.combatant(attacker).map(|c| c.side);
        let player_attacking = attacker_side.is_some_and(|s| s.is_player_side());

        let with_ability = |entry: LogEntry| match ability {
            Some(id) => entry.with_ability(id),
            None => entry,
        };

        if !result.hit {
            self.log.push(with_ability(
                LogEntry::new(round, attacker, LogKind::Dodge).with_target(defender),
            ));
            if player_attacking {
                self.summary.record_player_miss();
            }
            return 0;
        }

        let Some(target) = self.combatant_mut(defender) else {
            return 0;
        };
        let remaining = target.stats.hp;
        let lost = target.take_damage(result.damage);
        let defender_side = target.side;
        let defeated = !target.is_alive();

        let kind = if result.critical {
            LogKind::Critical
        } else {
            LogKind::Hit
        };
        self.log.push(with_ability(
            LogEntry::new(round, attacker, kind)
                .with_target(defender)
                .with_amount(result.damage),
        ));

        if defender_side.is_player_side() {
            self.summary.record_damage_taken(lost);
        } else if player_attacking {
            self.summary.record_player_hit(lost);
        }

        if defeated {
            let overkill_at = f64::from(remaining) * config.rewards.overkill_ratio;
            if player_attacking && f64::from(result.damage) >= overkill_at {
                self.summary.overkill = true;
            }
            self.mark_defeated(attacker, defender);
        }

        lost
    }

    /// Logs a defeat and bumps the enemy counter.
    pub(crate) fn mark_defeated(&mut self, by: CombatantId, defeated: CombatantId) {
        if self
            .combatant(defeated)
            .is_some_and(|c| c.side == Side::Enemy)
        {
            self.summary.enemies_defeated += 1;
        }
        self.log
            .push(LogEntry::new(self.round, by, LogKind::Defeated).with_target(defeated));
    }

    /// Heals `target` and logs it. Returns the HP actually restored.
    pub fn restore_hp(
        &mut self,
        source: CombatantId,
        target: CombatantId,
        amount: u32,
        ability: Option<&AbilityId>,
    ) -> u32 {
        let Some(combatant) = self.combatant_mut(target) else {
            return 0;
        };
        let healed = combatant.heal(amount);

        let mut entry = LogEntry::new(self.round, source, LogKind::Heal)
            .with_target(target)
            .with_amount(healed);
        if let Some(id) = ability {
            entry = entry.with_ability(id);
        }
        self.log.push(entry);
        healed
    }

    /// Applies a status effect through the ledger and logs the result.
    pub fn apply_status(
        &mut self,
        source: CombatantId,
        target: CombatantId,
        effect: StatusEffect,
        ability: Option<&AbilityId>,
    ) -> ApplyOutcome {
        let kind = effect.kind;
        let outcome = self.ledger.apply(target, effect);

        let log_kind = if outcome.is_applied() {
            LogKind::StatusApplied
        } else {
            LogKind::StatusRejected
        };
        let mut entry = LogEntry::new(self.round, source, log_kind)
            .with_target(target)
            .with_status(kind);
        if let ApplyOutcome::Refreshed { stacks, .. } = outcome {
            entry = entry.with_amount(u32::from(stacks));
        }
        if let Some(id) = ability {
            entry = entry.with_ability(id);
        }
        self.log.push(entry);
        outcome
    }

    /// Drops every per-session map. Called exactly once when a session ends.
    pub fn release(&mut self) {
        self.ledger.clear_all();
        self.cooldowns.clear();
        self.boss_phases.clear();
        self.turn = TurnState::new();
    }
}
