//! Turn scheduler and action execution.
//!
//! [`BattleEngine`] is the only writer of a [`BattleState`] during a battle.
//! It borrows the state, the shared ability catalog, the balance config and
//! an injected [`RandomSource`] for the duration of a call sequence; the
//! caller keeps ownership of all of them.
//!
//! A turn is two calls: [`BattleEngine::prepare_next_turn`] runs everything
//! that happens before the actor decides (status ticks, skips, turn-start
//! triggers) and returns who acts; [`BattleEngine::execute`] applies the
//! chosen [`Command`]. Player input can therefore be awaited between the two
//! without the engine ever blocking.

mod actions;
mod errors;
mod escape;
mod turns;

pub use errors::{ExecuteError, TurnError};
pub use escape::{DeclineReason, EscapeOutcome, EscapeTracker, escape_chance};

use crate::ability::{
    AbilityCatalog, AbilityContext, AbilityId, AbilityOutcome, InvalidAction, Trigger,
};
use crate::ai::{BattleContext, Decision, DecisionKind};
use crate::config::BattleConfig;
use crate::env::RandomSource;
use crate::state::{BattleState, LogEntry, Outcome};
use crate::stats::{CombatantId, Side};

/// Who chooses the actions of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Controller {
    Player,
    Companion,
    Ai,
}

impl From<Side> for Controller {
    fn from(side: Side) -> Self {
        match side {
            Side::Player => Self::Player,
            Side::Companion => Self::Companion,
            Side::Enemy => Self::Ai,
        }
    }
}

/// What the scheduler wants next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPrompt {
    Act {
        actor: CombatantId,
        controller: Controller,
    },
    Finished(Outcome),
}

/// A turn action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Attack {
        target: CombatantId,
    },
    Skill {
        ability: AbilityId,
        target: Option<CombatantId>,
    },
    Defend,
    Item,
    Escape,
}

impl From<Decision> for Command {
    /// An attack without a target degrades to defending.
    fn from(decision: Decision) -> Self {
        match decision.kind {
            DecisionKind::Attack => decision
                .target
                .map_or(Command::Defend, |target| Command::Attack { target }),
            DecisionKind::Skill(ability) => Command::Skill {
                ability,
                target: decision.target,
            },
            DecisionKind::Defend => Command::Defend,
            DecisionKind::Item => Command::Item,
        }
    }
}

/// Everything one executed command did.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionReport {
    pub actor: CombatantId,
    pub command: Command,
    /// Set when the command was invalid and the turn was lost.
    pub forfeited: Option<InvalidAction>,
    pub ability: Option<AbilityOutcome>,
    pub escape: Option<EscapeOutcome>,
    /// Set when this action ended the battle.
    pub outcome: Option<Outcome>,
    /// Log entries appended while executing the command.
    pub entries: Vec<LogEntry>,
}

impl ActionReport {
    fn new(actor: CombatantId, command: Command) -> Self {
        Self {
            actor,
            command,
            forfeited: None,
            ability: None,
            escape: None,
            outcome: None,
            entries: Vec::new(),
        }
    }
}

/// Result of [`BattleEngine::play_turn`].
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Acted(ActionReport),
    Finished(Outcome),
}

/// Supplies commands for player-controlled turns.
pub trait PlayerController {
    fn choose(&mut self, state: &BattleState, actor: CombatantId) -> Command;
}

impl<F> PlayerController for F
where
    F: FnMut(&BattleState, CombatantId) -> Command,
{
    fn choose(&mut self, state: &BattleState, actor: CombatantId) -> Command {
        self(state, actor)
    }
}

/// Battle engine that schedules turns and executes commands.
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    catalog: &'a AbilityCatalog,
    config: &'a BattleConfig,
    rng: &'a mut dyn RandomSource,
}

impl<'a> BattleEngine<'a> {
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

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        self.catalog
    }

    pub fn config(&self) -> &BattleConfig {
        self.config
    }

    /// The actor prepared by the last `prepare_next_turn`, if any.
    pub fn current_actor(&self) -> Option<CombatantId> {
        self.state.turn.current
    }

    pub fn controller_of(&self, id: CombatantId) -> Option<Controller> {
        self.state.combatant(id).map(|c| Controller::from(c.side))
    }

    /// Draws a roll from the injected source.
    pub(crate) fn rng(&mut self) -> &mut dyn RandomSource {
        &mut *self.rng
    }

    fn abilities(&mut self) -> AbilityContext<'_> {
        AbilityContext::new(self.state, self.catalog, self.config, self.rng)
    }

    /// Manual abilities of `actor` that are off cooldown, in list order.
    pub fn ready_skills(&self, actor: CombatantId) -> Vec<AbilityId> {
        self.state.ready_skills(actor, self.catalog)
    }

    /// What an AI or companion sees when deciding.
    pub fn battle_context(&self, actor: CombatantId) -> BattleContext {
        self.state.battle_context(actor, self.catalog)
    }

    /// Fires every non-manual ability of `actor` that reacts to `event`.
    ///
    /// Returns the outcomes of abilities that actually fired.
    fn fire_triggers(
        &mut self,
        actor: CombatantId,
        event: Trigger,
        target: Option<CombatantId>,
    ) -> Vec<AbilityOutcome> {
        let Some(combatant) = self.state.combatant(actor) else {
            return Vec::new();
        };
        let candidates: Vec<AbilityId> = combatant
            .abilities
            .iter()
            .filter(|id| {
                self.catalog
                    .get(id)
                    .is_some_and(|a| !a.is_manual() && a.trigger.matches(event))
            })
            .cloned()
            .collect();

        let mut fired = Vec::new();
        for id in candidates {
            if !self.state.is_alive(actor) {
                break;
            }
            let target = target.filter(|t| self.state.is_alive(*t));
            match self.abilities().try_execute(actor, &id, event, target) {
                Ok(outcome) if outcome.success => fired.push(outcome),
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(actor = %actor, ability = %id, error = %err, "trigger failed");
                }
            }
        }
        fired
    }

    /// Convenience: prepares the next turn and executes it, asking
    /// `controller` for player commands.
    pub fn play_turn(
        &mut self,
        controller: &mut dyn PlayerController,
    ) -> Result<Step, ExecuteError> {
        match self.prepare_next_turn()? {
            TurnPrompt::Finished(outcome) => Ok(Step::Finished(outcome)),
            TurnPrompt::Act {
                actor,
                controller: Controller::Player,
            } => {
                let command = controller.choose(&*self.state, actor);
                self.execute(actor, command).map(Step::Acted)
            }
            TurnPrompt::Act { actor, .. } => self.execute_auto(actor).map(Step::Acted),
        }
    }

    /// Plays turns until the battle ends.
    pub fn run_to_end(
        &mut self,
        controller: &mut dyn PlayerController,
    ) -> Result<Outcome, ExecuteError> {
        loop {
            if let Step::Finished(outcome) = self.play_turn(controller)? {
                return Ok(outcome);
            }
        }
    }
}
