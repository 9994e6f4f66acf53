//! Ability registry errors.

use crate::error::{ErrorSeverity, GameError};
use crate::stats::CombatantId;

use super::types::AbilityId;

/// A command or ability call that cannot be carried out.
///
/// The engine forfeits the offending turn and records a log entry; the battle
/// itself continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidAction {
    #[error("unknown ability `{ability}`")]
    UnknownAbility { ability: AbilityId },

    #[error("{caster} does not know ability `{ability}`")]
    AbilityNotKnown {
        caster: CombatantId,
        ability: AbilityId,
    },

    #[error("ability `{ability}` is not ready ({remaining} rounds left)")]
    AbilityNotReady { ability: AbilityId, remaining: u32 },

    #[error("ability `{ability}` cannot be used as an action")]
    NotManual { ability: AbilityId },

    #[error("combatant {id} does not exist")]
    UnknownCombatant { id: CombatantId },

    #[error("{actor} cannot act")]
    ActorCannotAct { actor: CombatantId },

    #[error("target {target} is already defeated")]
    DeadTarget { target: CombatantId },

    #[error("target {target} is not a valid target")]
    InvalidTarget { target: CombatantId },

    #[error("no living target available")]
    NoTarget,

    #[error("{actor} has no items left")]
    NoItems { actor: CombatantId },

    #[error("only the player can attempt to escape")]
    EscapeNotAllowed,
}

impl GameError for InvalidAction {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAbility { .. } => "ACTION_UNKNOWN_ABILITY",
            Self::AbilityNotKnown { .. } => "ACTION_ABILITY_NOT_KNOWN",
            Self::AbilityNotReady { .. } => "ACTION_ABILITY_NOT_READY",
            Self::NotManual { .. } => "ACTION_NOT_MANUAL",
            Self::UnknownCombatant { .. } => "ACTION_UNKNOWN_COMBATANT",
            Self::ActorCannotAct { .. } => "ACTION_ACTOR_CANNOT_ACT",
            Self::DeadTarget { .. } => "ACTION_DEAD_TARGET",
            Self::InvalidTarget { .. } => "ACTION_INVALID_TARGET",
            Self::NoTarget => "ACTION_NO_TARGET",
            Self::NoItems { .. } => "ACTION_NO_ITEMS",
            Self::EscapeNotAllowed => "ACTION_ESCAPE_NOT_ALLOWED",
        }
    }
}

/// Malformed ability content, reported while building an
/// [`AbilityCatalog`](super::AbilityCatalog).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate ability id `{0}`")]
    DuplicateId(AbilityId),

    #[error("ability `{ability}`: cooldown {cooldown} is negative")]
    NegativeCooldown { ability: AbilityId, cooldown: i32 },

    #[error("ability `{ability}`: chance {chance} is outside [0, 1]")]
    ChanceOutOfRange { ability: AbilityId, chance: f64 },

    #[error("ability `{ability}` has no effects")]
    NoEffects { ability: AbilityId },

    #[error("ability `{ability}`, effect {index}: duration {duration} is negative")]
    NegativeDuration {
        ability: AbilityId,
        index: usize,
        duration: i32,
    },

    #[error("ability `{ability}`, effect {index}: missing `{field}`")]
    MissingField {
        ability: AbilityId,
        index: usize,
        field: &'static str,
    },

    #[error("ability `{ability}`, effect {index}: {reason}")]
    InvalidEffect {
        ability: AbilityId,
        index: usize,
        reason: &'static str,
    },
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "CATALOG_DUPLICATE_ID",
            Self::NegativeCooldown { .. } => "CATALOG_NEGATIVE_COOLDOWN",
            Self::ChanceOutOfRange { .. } => "CATALOG_CHANCE_OUT_OF_RANGE",
            Self::NoEffects { .. } => "CATALOG_NO_EFFECTS",
            Self::NegativeDuration { .. } => "CATALOG_NEGATIVE_DURATION",
            Self::MissingField { .. } => "CATALOG_MISSING_FIELD",
            Self::InvalidEffect { .. } => "CATALOG_INVALID_EFFECT",
        }
    }
}
