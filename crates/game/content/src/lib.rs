//! Data-driven battle content.
//!
//! This crate houses the static tables a battle session is built from and
//! provides loaders for the RON/TOML data files:
//! - Ability catalog (`abilities.ron`)
//! - Monster table (`monsters.ron`)
//! - Companion profiles (`companions.ron`)
//! - Balance configuration (`balance.toml`)
//!
//! Content is read-only once loaded. The runtime shares a single
//! [`ContentBundle`] between sessions; nothing in here ever appears in
//! battle state except through the core constructors.

pub mod bundle;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use bundle::{ContentBundle, MonsterDefinition};

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, CompanionLoader, ConfigLoader, ContentFactory, LoadResult, MonsterLoader,
};
