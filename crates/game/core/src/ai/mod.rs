//! AI decision module.
//!
//! Enemies pick actions by a weighted draw over a static per-pattern table.
//! Bosses swap tables (and stat multipliers) as their HP drops; see
//! [`BossPhaseTracker`].

mod boss;
mod decide;
mod pattern;

pub use boss::{BOSS_PHASES, BossPhase, BossPhaseTracker};
pub use decide::{BattleContext, Decision, DecisionKind, TargetInfo, decide_action, select_target};
pub use pattern::{AiPattern, PatternWeights, TargetPriority};
