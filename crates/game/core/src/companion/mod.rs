//! Companion assist processor.
//!
//! Companions are persistent allies: a [`CompanionProfile`] lives between
//! battles, turns into a mood-adjusted [`Combatant`](crate::Combatant) for
//! one battle, acts through [`process_companion_turn`] and grows through
//! [`process_companion_rewards`].

mod assist;
mod mood;
mod profile;

pub use assist::{AnimationCue, CompanionTurnResult, EnemySnapshot, process_companion_turn};
pub use mood::{Mood, MoodModifiers};
pub use profile::{CompanionProfile, CompanionReward, MAX_LOYALTY, process_companion_rewards};
