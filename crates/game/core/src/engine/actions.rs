//! Command execution.

use crate::ability::{AbilityId, InvalidAction, Trigger};
use crate::ai::decide_action;
use crate::combat::resolve_hit;
use crate::error::GameError;
use crate::state::{BattlePhase, LogEntry, LogKind};
use crate::stats::CombatantId;

use super::{ActionReport, BattleEngine, Command, Controller, ExecuteError};

impl BattleEngine<'_> {
    /// Executes `command` for the actor prepared by `prepare_next_turn`.
    ///
    /// An invalid command forfeits the turn: it is logged, reported in
    /// [`ActionReport::forfeited`] and the battle continues. Only API misuse
    /// (wrong actor, battle not running) returns an error.
    pub fn execute(
        &mut self,
        actor: CombatantId,
        command: Command,
    ) -> Result<ActionReport, ExecuteError> {
        match self.state.phase {
            BattlePhase::Preparation => return Err(ExecuteError::NotStarted),
            BattlePhase::Battle => {}
            _ => return Err(ExecuteError::BattleOver),
        }
        let current = self.state.turn.current;
        if current != Some(actor) {
            return Err(ExecuteError::NotCurrentActor { actor, current });
        }

        self.state.turn.current = None;
        self.state.summary.actions += 1;
        let log_start = self.state.log.len();
        let mut report = ActionReport::new(actor, command.clone());

        let result = match command {
            Command::Attack { target } => self.attack(actor, target),
            Command::Skill { ability, target } => self.use_skill(actor, &ability, target, &mut report),
            Command::Defend => self.defend(actor),
            Command::Item => self.use_item(actor),
            Command::Escape => {
                if actor.is_player() {
                    report.escape = Some(self.attempt_escape(actor));
                    Ok(())
                } else {
                    Err(InvalidAction::EscapeNotAllowed)
                }
            }
        };

        if let Err(invalid) = result {
            tracing::warn!(
                actor = %actor,
                code = invalid.error_code(),
                error = %invalid,
                "invalid action, turn forfeited"
            );
            self.state.log.push(
                LogEntry::new(self.state.round, actor, LogKind::InvalidAction)
                    .with_note(invalid.to_string()),
            );
            report.forfeited = Some(invalid);
        }

        report.outcome = self.check_terminal();
        report.entries = self.state.log.since(log_start).to_vec();
        Ok(report)
    }

    /// Chooses and executes a command for an AI or companion actor.
    pub fn execute_auto(&mut self, actor: CombatantId) -> Result<ActionReport, ExecuteError> {
        match self.controller_of(actor) {
            Some(Controller::Player) => Err(ExecuteError::RequiresInput { actor }),
            Some(Controller::Companion) => {
                crate::companion::process_companion_turn(self, actor).map(|turn| turn.report)
            }
            Some(Controller::Ai) | None => {
                let command = self.ai_command(actor);
                self.execute(actor, command)
            }
        }
    }

    /// Runs the actor's AI pattern and maps the decision to a command.
    pub fn ai_command(&mut self, actor: CombatantId) -> Command {
        let context = self.battle_context(actor);
        let Some(combatant) = self.state.combatant(actor) else {
            return Command::Defend;
        };
        let pattern = combatant.ai_pattern.unwrap_or_default();
        let decision = decide_action(pattern, combatant, &context, &mut *self.rng);
        Command::from(decision)
    }

    fn attack(&mut self, actor: CombatantId, target: CombatantId) -> Result<(), InvalidAction> {
        let attacker = self
            .state
            .combatant(actor)
            .ok_or(InvalidAction::UnknownCombatant { id: actor })?;
        let defender = self
            .state
            .combatant(target)
            .ok_or(InvalidAction::UnknownCombatant { id: target })?;
        if !defender.is_alive() {
            return Err(InvalidAction::DeadTarget { target });
        }
        if !attacker.side.is_hostile_to(defender.side) {
            return Err(InvalidAction::InvalidTarget { target });
        }

        let (Some(a), Some(d)) = (self.state.snapshot(actor), self.state.snapshot(target)) else {
            return Err(InvalidAction::UnknownCombatant { id: target });
        };
        let result = resolve_hit(&a, &d, None, 1.0, self.config, &mut *self.rng);
        self.state
            .apply_hit(actor, target, &result, None, self.config);

        self.fire_triggers(actor, Trigger::OnAttack, Some(target));
        if result.critical {
            self.fire_triggers(actor, Trigger::OnCrit, Some(target));
        }
        if result.hit && self.state.is_alive(target) {
            self.fire_triggers(target, Trigger::OnDamaged, Some(actor));
        }
        Ok(())
    }

    fn use_skill(
        &mut self,
        actor: CombatantId,
        ability: &AbilityId,
        target: Option<CombatantId>,
        report: &mut ActionReport,
    ) -> Result<(), InvalidAction> {
        let combatant = self
            .state
            .combatant(actor)
            .ok_or(InvalidAction::UnknownCombatant { id: actor })?;
        if !combatant.abilities.contains(ability) {
            return Err(InvalidAction::AbilityNotKnown {
                caster: actor,
                ability: ability.clone(),
            });
        }
        let definition = self
            .catalog
            .get(ability)
            .ok_or_else(|| InvalidAction::UnknownAbility {
                ability: ability.clone(),
            })?;
        if !definition.is_manual() {
            return Err(InvalidAction::NotManual {
                ability: ability.clone(),
            });
        }
        let remaining = self.state.cooldowns.remaining(actor, ability);
        if remaining > 0 {
            return Err(InvalidAction::AbilityNotReady {
                ability: ability.clone(),
                remaining,
            });
        }

        let outcome = self
            .abilities()
            .try_execute(actor, ability, Trigger::Manual, target)?;
        if let Some(reason) = outcome.skipped {
            self.state.log.push(
                LogEntry::new(self.state.round, actor, LogKind::AbilityFailed)
                    .with_ability(ability)
                    .with_note(reason.to_string()),
            );
        }
        report.ability = Some(outcome);
        Ok(())
    }

    fn defend(&mut self, actor: CombatantId) -> Result<(), InvalidAction> {
        let combatant = self
            .state
            .combatant_mut(actor)
            .ok_or(InvalidAction::UnknownCombatant { id: actor })?;
        combatant.defending = true;
        self.state
            .log
            .push(LogEntry::new(self.state.round, actor, LogKind::Defend));
        Ok(())
    }

    fn use_item(&mut self, actor: CombatantId) -> Result<(), InvalidAction> {
        let ratio = self.config.damage.item_heal_ratio;
        let combatant = self
            .state
            .combatant_mut(actor)
            .ok_or(InvalidAction::UnknownCombatant { id: actor })?;
        if combatant.items == 0 {
            return Err(InvalidAction::NoItems { actor });
        }
        combatant.items -= 1;
        let amount = (f64::from(combatant.stats.max_hp) * ratio).floor() as u32;

        self.state
            .log
            .push(LogEntry::new(self.state.round, actor, LogKind::Item));
        self.state.restore_hp(actor, actor, amount, None);
        Ok(())
    }
}
