//! One battle from start to rewards.

use std::sync::Arc;

use battle_content::ContentBundle;
use battle_core::{
    BattleConfig, BattleEngine, BattleState, CombatantId, CompanionProfile, CompanionReward,
    Controller, Difficulty, GameError, Outcome, RandomSource, RewardContext, Step, TurnPrompt,
    compute_rewards, process_companion_rewards,
};

use crate::api::{ActionProvider, Result, SessionError};
use crate::report::{BattleReport, CompanionReport};

/// A running battle.
///
/// Owns its state, balance config and roll stream exclusively; the content is
/// shared. Dropping the session cancels the battle.
pub struct BattleSession {
    id: u64,
    content: Arc<ContentBundle>,
    config: BattleConfig,
    state: BattleState,
    rng: Box<dyn RandomSource + Send>,
    difficulty: Difficulty,
    companion: Option<(CombatantId, CompanionProfile)>,
    reward_context: RewardContext,
    collected: bool,
}

impl BattleSession {
    pub(crate) fn new(
        id: u64,
        content: Arc<ContentBundle>,
        config: BattleConfig,
        state: BattleState,
        rng: Box<dyn RandomSource + Send>,
        difficulty: Difficulty,
        companion: Option<(CombatantId, CompanionProfile)>,
        reward_context: RewardContext,
    ) -> Self {
        Self {
            id,
            content,
            config,
            state,
            rng,
            difficulty,
            companion,
            reward_context,
            collected: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn companion_id(&self) -> Option<CombatantId> {
        self.companion.as_ref().map(|(id, _)| *id)
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub(crate) fn engine(&mut self) -> BattleEngine<'_> {
        BattleEngine::new(
            &mut self.state,
            self.content.catalog(),
            &self.config,
            &mut *self.rng,
        )
    }

    /// Plays one turn. Player turns await `player`; everyone else is driven
    /// by the engine.
    pub async fn step(&mut self, player: &dyn ActionProvider) -> Result<Step> {
        let (actor, controller) = match self.engine().prepare_next_turn()? {
            TurnPrompt::Finished(outcome) => return Ok(Step::Finished(outcome)),
            TurnPrompt::Act { actor, controller } => (actor, controller),
        };

        let report = if controller == Controller::Player {
            let command = player.provide_command(actor, &self.state).await?;
            self.engine().execute(actor, command)?
        } else {
            self.engine().execute_auto(actor)?
        };
        Ok(Step::Acted(report))
    }

    /// Steps until the battle ends, then collects the rewards.
    ///
    /// Fails with [`SessionError::RoundLimit`] once the battle runs past the
    /// session's `limits.max_rounds`.
    pub async fn run(&mut self, player: &dyn ActionProvider) -> Result<BattleReport> {
        loop {
            match self.step(player).await {
                Ok(Step::Finished(outcome)) => {
                    tracing::debug!(session = self.id, %outcome, "battle finished");
                    break;
                }
                Ok(Step::Acted(_)) => {}
                Err(err) => {
                    self.log_failure(&err);
                    return Err(err);
                }
            }
        }
        self.finish()
    }

    fn log_failure(&self, err: &SessionError) {
        let severity = err.severity();
        if severity.is_recoverable() {
            tracing::warn!(
                session = self.id,
                round = self.state.round,
                code = err.error_code(),
                severity = severity.as_str(),
                error = %err,
                "session step failed"
            );
        } else {
            tracing::error!(
                session = self.id,
                round = self.state.round,
                code = err.error_code(),
                severity = severity.as_str(),
                error = %err,
                "session aborted"
            );
        }
    }

    /// Computes rewards and companion growth, then releases the per-session
    /// ledgers. Works once per session.
    pub fn finish(&mut self) -> Result<BattleReport> {
        if self.collected {
            return Err(SessionError::AlreadyFinished);
        }
        let outcome = self.state.outcome().ok_or(SessionError::NotFinished)?;

        let rewards = compute_rewards(
            outcome,
            &self.state,
            self.difficulty,
            &self.reward_context,
            &self.config,
            &mut *self.rng,
        );

        let enemies_defeated = self.state.summary.enemies_defeated;
        let companion = self.companion.as_mut().map(|(_, profile)| {
            let reward = match outcome {
                Outcome::Escaped => CompanionReward::default(),
                _ => process_companion_rewards(
                    profile,
                    outcome == Outcome::Victory,
                    enemies_defeated,
                ),
            };
            let levels_gained = profile.apply_reward(&reward);
            CompanionReport {
                reward,
                levels_gained,
                profile: profile.clone(),
            }
        });

        let report = BattleReport {
            session: self.id,
            outcome,
            difficulty: self.difficulty,
            summary: self.state.summary,
            rewards,
            companion,
            log: self.state.log.entries().to_vec(),
        };

        self.state.release();
        self.collected = true;
        tracing::info!(
            session = self.id,
            %outcome,
            rounds = report.summary.rounds,
            exp = report.rewards.exp,
            gold = report.rewards.gold,
            "session finished"
        );
        Ok(report)
    }
}
