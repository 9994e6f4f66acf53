//! Deterministic turn-based battle rules.
//!
//! `battle-core` defines the canonical combat rules (damage resolution, status
//! effects, abilities, AI, scheduling, rewards) and exposes pure APIs reused by
//! the runtime and offline tools. All battle mutation flows through
//! [`engine::BattleEngine`], which borrows a caller-owned [`BattleState`] and an
//! injected [`RandomSource`]. Nothing in this crate is process-global.
pub mod ability;
pub mod ai;
pub mod combat;
pub mod companion;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod reward;
pub mod state;
pub mod stats;
pub mod status;

pub use ability::{
    Ability, AbilityCatalog, AbilityContext, AbilityDefinition, AbilityId, AbilityOutcome,
    AppliedEffect, AppliedKind, CatalogError, CooldownTracker, EffectDefinition, EffectKind,
    EffectKindTag, EffectSpec, EffectTarget, InvalidAction, SkipReason, Trigger,
};
pub use ai::{
    AiPattern, BattleContext, BossPhase, BossPhaseTracker, Decision, DecisionKind,
    TargetPriority, decide_action,
};
pub use combat::{CombatSnapshot, HitResult, apply_damage, resolve_hit};
pub use companion::{
    AnimationCue, CompanionProfile, CompanionReward, CompanionTurnResult, EnemySnapshot, Mood,
    process_companion_rewards, process_companion_turn,
};
pub use config::BattleConfig;
pub use engine::{
    ActionReport, BattleEngine, Command, Controller, DeclineReason, EscapeOutcome, ExecuteError,
    PlayerController, Step, TurnError, TurnPrompt,
};
pub use env::{PcgRng, RandomSource, ScriptedRng, compute_seed};
pub use error::{ErrorSeverity, GameError};
pub use reward::{
    AppliedBonus, BonusKind, Difficulty, DropEntry, RewardBundle, RewardContext, compute_rewards,
};
pub use state::{
    BattlePhase, BattleState, BattleSummary, CombatLog, LogEntry, LogKind, Outcome,
};
pub use stats::{
    Combatant, CombatantDefinition, CombatantId, Element, Side, StatKind, Stats, Tier,
};
pub use status::{
    ApplyOutcome, StatusCategory, StatusEffect, StatusKind, StatusLedger, TickPhase, TickReport,
};
