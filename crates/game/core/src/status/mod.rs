//! Status effect system.
//!
//! Effects are timed by turn-phase ticks rather than wall-clock time: each
//! kind fires and decrements on exactly one [`TickPhase`], and an effect is
//! active iff its remaining duration is above zero.

mod effect;
mod ledger;

pub use effect::{EffectId, StatusCategory, StatusEffect, StatusKind, TickPhase};
pub use ledger::{ApplyOutcome, FiredEffect, RejectReason, StatusLedger, TickReport};
