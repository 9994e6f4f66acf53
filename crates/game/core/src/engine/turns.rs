//! Round-robin turn scheduling.

use crate::ability::Trigger;
use crate::state::{BattlePhase, LogEntry, LogKind, Outcome};
use crate::stats::CombatantId;
use crate::status::{StatusKind, TickPhase, TickReport};

use super::{BattleEngine, Controller, TurnError, TurnPrompt};

/// What happened at the start of an actor's turn.
enum TurnStart {
    Ready,
    Skipped,
    Ended(Outcome),
}

impl BattleEngine<'_> {
    /// Moves the battle from preparation into round 1.
    pub fn start(&mut self) -> Result<(), TurnError> {
        if self.state.phase != BattlePhase::Preparation {
            return Err(TurnError::AlreadyStarted);
        }
        if !self.state.is_alive(CombatantId::PLAYER) {
            return Err(TurnError::NoPlayer);
        }
        if self.state.living_enemies().next().is_none() {
            return Err(TurnError::NoEnemies);
        }

        self.state.phase = BattlePhase::Battle;
        self.state
            .log
            .push(LogEntry::new(0, CombatantId::PLAYER, LogKind::BattleStart));
        self.begin_round();
        Ok(())
    }

    /// Living combatants by descending effective speed, ties by id.
    pub fn turn_order(&self) -> Vec<CombatantId> {
        let mut order: Vec<(u32, CombatantId)> = self
            .state
            .living()
            .map(|c| (self.state.effective_speed(c.id), c.id))
            .collect();
        order.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Advances to the next actor that can act.
    ///
    /// Runs the actor's start-of-turn status tick, skips it when it is
    /// incapacitated, fires turn-start triggers and updates boss phases.
    /// Rolls over to a new round when the queue empties. Calling this again
    /// before `execute` returns the same actor, and calling it again after a
    /// round-limit error returns the same error without ticking anything.
    pub fn prepare_next_turn(&mut self) -> Result<TurnPrompt, TurnError> {
        match self.state.phase {
            BattlePhase::Preparation => return Err(TurnError::NotStarted),
            BattlePhase::Battle => {}
            phase => {
                if let Some(outcome) = phase.outcome() {
                    return Ok(TurnPrompt::Finished(outcome));
                }
            }
        }

        if let Some(actor) = self.state.turn.current {
            return Ok(self.prompt(actor));
        }

        loop {
            let Some(actor) = self.state.turn.queue.pop_front() else {
                if !self.state.turn.round_closed {
                    self.end_round();
                }
                if self.state.round >= self.config.limits.max_rounds {
                    return Err(TurnError::RoundLimit {
                        limit: self.config.limits.max_rounds,
                    });
                }
                self.begin_round();
                continue;
            };
            if !self.state.is_alive(actor) {
                continue;
            }

            match self.begin_turn(actor) {
                TurnStart::Ready => {
                    self.state.turn.current = Some(actor);
                    return Ok(self.prompt(actor));
                }
                TurnStart::Skipped => continue,
                TurnStart::Ended(outcome) => return Ok(TurnPrompt::Finished(outcome)),
            }
        }
    }

    fn prompt(&self, actor: CombatantId) -> TurnPrompt {
        TurnPrompt::Act {
            actor,
            controller: self.controller_of(actor).unwrap_or(Controller::Ai),
        }
    }

    fn begin_round(&mut self) {
        self.state.round += 1;
        self.state.turn.round_closed = false;
        let order = self.turn_order();
        tracing::debug!(round = self.state.round, order = ?order, "round start");
        self.state.turn.queue = order.into();
        self.state.log.push(LogEntry::new(
            self.state.round,
            CombatantId::PLAYER,
            LogKind::RoundStart,
        ));
    }

    /// End-of-round bookkeeping: buff/debuff ticks, cooldowns, escape.
    fn end_round(&mut self) {
        let living: Vec<CombatantId> = self.state.living().map(|c| c.id).collect();
        for id in living {
            let report = self.state.ledger.tick(id, TickPhase::End);
            self.log_expired(id, &report);
        }
        self.state.cooldowns.tick();
        self.state.escape.tick();
        self.state.summary.rounds = self.state.round;
        self.state.turn.round_closed = true;
    }

    fn begin_turn(&mut self, actor: CombatantId) -> TurnStart {
        if let Some(combatant) = self.state.combatant_mut(actor) {
            combatant.defending = false;
        }

        let report = self.state.ledger.tick(actor, TickPhase::Start);
        self.apply_start_tick(actor, &report);

        if let Some(outcome) = self.check_terminal() {
            return TurnStart::Ended(outcome);
        }
        if !self.state.is_alive(actor) {
            return TurnStart::Skipped;
        }
        if report.incapacitated {
            let cause = report
                .fired
                .iter()
                .map(|f| f.kind)
                .find(StatusKind::is_incapacitating);
            let mut entry = LogEntry::new(self.state.round, actor, LogKind::Incapacitated);
            if let Some(kind) = cause {
                entry = entry.with_status(kind);
            }
            self.state.log.push(entry);
            tracing::debug!(actor = %actor, "turn skipped");
            return TurnStart::Skipped;
        }

        self.fire_triggers(actor, Trigger::OnTurnStart, None);
        if self
            .state
            .combatant(actor)
            .is_some_and(|c| c.is_below_half())
        {
            self.fire_triggers(actor, Trigger::OnBelowHalfHp, None);
        }
        self.update_boss_phase(actor);

        if let Some(outcome) = self.check_terminal() {
            return TurnStart::Ended(outcome);
        }
        if self.state.is_alive(actor) {
            TurnStart::Ready
        } else {
            TurnStart::Skipped
        }
    }

    /// Applies damage-over-time and regen from a start tick.
    fn apply_start_tick(&mut self, actor: CombatantId, report: &TickReport) {
        let round = self.state.round;
        let was_alive = self.state.is_alive(actor);
        let mut last_source = actor;

        for fired in &report.fired {
            if fired.kind.is_damage_over_time() {
                let Some(combatant) = self.state.combatant_mut(actor) else {
                    continue;
                };
                let lost = combatant.take_damage(fired.amount);
                if combatant.side.is_player_side() {
                    self.state.summary.record_damage_taken(lost);
                }
                last_source = fired.source;
                self.state.log.push(
                    LogEntry::new(round, fired.source, LogKind::DamageOverTime)
                        .with_target(actor)
                        .with_amount(lost)
                        .with_status(fired.kind),
                );
            } else if fired.kind == StatusKind::Regen {
                let Some(combatant) = self.state.combatant_mut(actor) else {
                    continue;
                };
                let healed = combatant.heal(fired.amount);
                self.state.log.push(
                    LogEntry::new(round, fired.source, LogKind::Heal)
                        .with_target(actor)
                        .with_amount(healed)
                        .with_status(fired.kind),
                );
            }
        }

        if was_alive && !self.state.is_alive(actor) {
            self.state.mark_defeated(last_source, actor);
        }
        self.log_expired(actor, report);
    }

    fn log_expired(&mut self, actor: CombatantId, report: &TickReport) {
        for effect in &report.expired {
            self.state.log.push(
                LogEntry::new(self.state.round, actor, LogKind::StatusExpired)
                    .with_status(effect.kind),
            );
        }
    }

    fn update_boss_phase(&mut self, actor: CombatantId) {
        let Some(ratio) = self.state.combatant(actor).map(|c| c.hp_ratio()) else {
            return;
        };
        let Some(tracker) = self.state.boss_phases.get_mut(&actor) else {
            return;
        };
        if let Some(phase) = tracker.observe(ratio) {
            tracing::debug!(boss = %actor, phase = phase.index, "boss phase change");
            self.state.summary.phases_completed = self
                .state
                .boss_phases
                .values()
                .map(|t| u32::from(t.index()))
                .sum();
            self.state.log.push(
                LogEntry::new(self.state.round, actor, LogKind::PhaseChange)
                    .with_amount(u32::from(phase.index)),
            );
        }
    }

    /// Ends the battle if a terminal condition holds.
    ///
    /// All enemies down wins even if the player fell in the same action.
    pub(super) fn check_terminal(&mut self) -> Option<Outcome> {
        match self.state.phase {
            BattlePhase::Battle => {}
            phase => return phase.outcome(),
        }
        let outcome = if self.state.living_enemies().next().is_none() {
            Outcome::Victory
        } else if !self.state.is_alive(CombatantId::PLAYER) {
            Outcome::Defeat
        } else {
            return None;
        };
        self.finish(outcome);
        Some(outcome)
    }

    pub(super) fn finish(&mut self, outcome: Outcome) {
        self.state.phase = outcome.phase();
        self.state.turn.current = None;
        self.state.turn.queue.clear();
        self.state.summary.rounds = self.state.round;

        let kind = match outcome {
            Outcome::Victory => Some(LogKind::Victory),
            Outcome::Defeat => Some(LogKind::Defeat),
            Outcome::Escaped => None,
        };
        if let Some(kind) = kind {
            self.state
                .log
                .push(LogEntry::new(self.state.round, CombatantId::PLAYER, kind));
        }
        tracing::debug!(outcome = %outcome, round = self.state.round, "battle finished");
    }
}
