//! Engine API misuse errors.
//!
//! Invalid game actions are not errors at this level: they forfeit the turn
//! and show up in the combat log as [`InvalidAction`](crate::InvalidAction).
//! The errors here mean the caller drove the engine incorrectly.

use crate::error::{ErrorSeverity, GameError};
use crate::stats::CombatantId;

/// Errors raised while scheduling turns.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("battle has not started")]
    NotStarted,

    #[error("battle has already started")]
    AlreadyStarted,

    #[error("no living player in the battle")]
    NoPlayer,

    #[error("no living enemies in the battle")]
    NoEnemies,

    #[error("battle exceeded {limit} rounds")]
    RoundLimit { limit: u32 },
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RoundLimit { .. } => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotStarted => "TURN_NOT_STARTED",
            Self::AlreadyStarted => "TURN_ALREADY_STARTED",
            Self::NoPlayer => "TURN_NO_PLAYER",
            Self::NoEnemies => "TURN_NO_ENEMIES",
            Self::RoundLimit { .. } => "TURN_ROUND_LIMIT",
        }
    }
}

/// Errors surfaced while executing a command through the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    #[error("battle has not started")]
    NotStarted,

    #[error("battle is over")]
    BattleOver,

    #[error("{actor} is not the current actor (current: {current:?})")]
    NotCurrentActor {
        actor: CombatantId,
        current: Option<CombatantId>,
    },

    #[error("{actor} is player-controlled and needs a command")]
    RequiresInput { actor: CombatantId },

    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Turn(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotStarted => "EXECUTE_NOT_STARTED",
            Self::BattleOver => "EXECUTE_BATTLE_OVER",
            Self::NotCurrentActor { .. } => "EXECUTE_NOT_CURRENT_ACTOR",
            Self::RequiresInput { .. } => "EXECUTE_REQUIRES_INPUT",
            Self::Turn(err) => err.error_code(),
        }
    }
}
