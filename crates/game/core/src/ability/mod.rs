//! Ability and cooldown registry.
//!
//! Abilities are read-only content validated once into an [`AbilityCatalog`];
//! per-battle mutable state (cooldowns) lives in [`CooldownTracker`], owned by
//! the battle. Execution goes through [`AbilityContext::try_execute`], which
//! feeds every effect to the damage resolver or the status ledger.

mod catalog;
mod cooldown;
mod errors;
mod execute;
mod types;

pub use catalog::{AbilityCatalog, AbilityDefinition, EffectDefinition, EffectKindTag};
pub use cooldown::CooldownTracker;
pub use errors::{CatalogError, InvalidAction};
pub use execute::{
    AbilityContext, AbilityOutcome, AppliedEffect, AppliedKind, SkipReason, resolve_target,
};
pub use types::{Ability, AbilityId, EffectKind, EffectSpec, EffectTarget, Trigger};
