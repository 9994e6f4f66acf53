//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine misuse, content lookups and provider failures so clients can
//! bubble them up with consistent context.
use battle_core::{CombatantId, ErrorSeverity, ExecuteError, GameError, TurnError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown monster '{0}'")]
    UnknownMonster(String),

    #[error("unknown companion '{0}'")]
    UnknownCompanion(String),

    #[error("a session needs at least one monster")]
    NoEnemies,

    #[error("battle did not finish within {limit} rounds")]
    RoundLimit { limit: u32 },

    #[error("action provider has no command for {actor}")]
    ProviderExhausted { actor: CombatantId },

    #[error("battle is still running")]
    NotFinished,

    #[error("session rewards were already collected")]
    AlreadyFinished,

    #[error(transparent)]
    Turn(TurnError),

    #[error(transparent)]
    Execute(ExecuteError),
}

impl From<TurnError> for SessionError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::RoundLimit { limit } => Self::RoundLimit { limit },
            TurnError::NoEnemies => Self::NoEnemies,
            other => Self::Turn(other),
        }
    }
}

impl From<ExecuteError> for SessionError {
    fn from(err: ExecuteError) -> Self {
        match err {
            ExecuteError::Turn(turn) => turn.into(),
            other => Self::Execute(other),
        }
    }
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownMonster(_) | Self::UnknownCompanion(_) | Self::NoEnemies => {
                ErrorSeverity::Validation
            }
            Self::ProviderExhausted { .. } | Self::NotFinished => ErrorSeverity::Recoverable,
            Self::RoundLimit { .. } | Self::AlreadyFinished => ErrorSeverity::Fatal,
            Self::Turn(err) => err.severity(),
            Self::Execute(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownMonster(_) => "SESSION_UNKNOWN_MONSTER",
            Self::UnknownCompanion(_) => "SESSION_UNKNOWN_COMPANION",
            Self::NoEnemies => "SESSION_NO_ENEMIES",
            Self::RoundLimit { .. } => "SESSION_ROUND_LIMIT",
            Self::ProviderExhausted { .. } => "SESSION_PROVIDER_EXHAUSTED",
            Self::NotFinished => "SESSION_NOT_FINISHED",
            Self::AlreadyFinished => "SESSION_ALREADY_FINISHED",
            Self::Turn(err) => err.error_code(),
            Self::Execute(err) => err.error_code(),
        }
    }
}
