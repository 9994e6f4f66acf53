//! Asynchronous abstraction for sourcing player intent.
//!
//! The engine never waits. Whenever the player is up, the session asks an
//! [`ActionProvider`] for a command and awaits the answer outside the engine,
//! so the battle can run with human input, scripted fixtures, or an autopilot.
use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use battle_content::ContentBundle;
use battle_core::{AiPattern, BattleState, CombatantId, Command, PcgRng, decide_action};
use tokio::sync::Mutex;

use super::errors::{Result, SessionError};

/// Trait for providing the player's command based on the current battle state.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Scripted/replayed commands
/// - Automated play for simulations and tests
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide a command for `actor`, who has just been prepared to act.
    ///
    /// An invalid command is not an error here: the engine forfeits the turn
    /// and logs it.
    async fn provide_command(&self, actor: CombatantId, state: &BattleState) -> Result<Command>;
}

/// Replays a fixed list of commands in order.
pub struct ScriptedProvider {
    commands: Mutex<VecDeque<Command>>,
}

impl ScriptedProvider {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: Mutex::new(commands.into_iter().collect()),
        }
    }

    /// Commands not yet handed out.
    pub async fn remaining(&self) -> usize {
        self.commands.lock().await.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedProvider {
    async fn provide_command(&self, actor: CombatantId, _state: &BattleState) -> Result<Command> {
        self.commands
            .lock()
            .await
            .pop_front()
            .ok_or(SessionError::ProviderExhausted { actor })
    }
}

/// Plays the player with an AI pattern (balanced by default).
///
/// Has its own seeded roll stream so it never perturbs the session's rolls.
pub struct AutoPilotProvider {
    content: Arc<ContentBundle>,
    pattern: AiPattern,
    rng: Mutex<PcgRng>,
}

impl AutoPilotProvider {
    pub fn new(content: Arc<ContentBundle>, seed: u64) -> Self {
        Self {
            content,
            pattern: AiPattern::Balanced,
            rng: Mutex::new(PcgRng::new(seed)),
        }
    }

    pub fn with_pattern(mut self, pattern: AiPattern) -> Self {
        self.pattern = pattern;
        self
    }
}

#[async_trait]
impl ActionProvider for AutoPilotProvider {
    async fn provide_command(&self, actor: CombatantId, state: &BattleState) -> Result<Command> {
        let context = state.battle_context(actor, self.content.catalog());
        let Some(combatant) = state.combatant(actor) else {
            return Ok(Command::Defend);
        };

        let mut rng = self.rng.lock().await;
        let decision = decide_action(self.pattern, combatant, &context, &mut *rng);
        tracing::debug!(actor = %actor, decision = ?decision, "autopilot decision");
        Ok(Command::from(decision))
    }
}
