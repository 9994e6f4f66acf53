//! Damage resolver.
//!
//! Pure functions for resolving combat interactions. Nothing here mutates
//! battle state: callers apply the returned damage and append log entries.
//!
//! # Core Functions
//!
//! - `resolve_hit`: Complete hit resolution (accuracy + crit + damage + variance)
//! - `calculate_hit_chance` / `calculate_crit_chance`: Percentile chances
//! - `calculate_raw_damage`: Attack vs defense with elemental scaling
//! - `apply_damage`: HP reduction (clamped to 0)

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{apply_damage, apply_variance, calculate_raw_damage};
pub use hit::{calculate_crit_chance, calculate_hit_chance, crit_multiplier};
pub use result::{AttackOutcome, CombatSnapshot, HitResult, resolve_hit};
