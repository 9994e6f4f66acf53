//! Stat & element model.
//!
//! Pure data: per-combatant numeric stats, the closed [`StatKind`] enum used
//! for typed modifier lookups, element matchups, and the [`Combatant`] record
//! a battle session owns.

pub mod combatant;
pub mod element;
pub mod kind;

pub use combatant::{Combatant, CombatantDefinition, CombatantId, Side, Tier};
pub use element::{Element, Matchup};
pub use kind::{StatKind, Stats};
