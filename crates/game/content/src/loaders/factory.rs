//! Content factory for building a bundle from data files.

use std::path::{Path, PathBuf};

use battle_core::{AbilityCatalog, BattleConfig, CompanionProfile};

use crate::bundle::{ContentBundle, MonsterDefinition};
use crate::loaders::{AbilityLoader, CompanionLoader, ConfigLoader, LoadResult, MonsterLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── balance.toml     (optional)
/// ├── abilities.ron
/// ├── monsters.ron
/// └── companions.ron   (optional)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load balance configuration from `balance.toml`, or the defaults when
    /// the file does not exist.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("balance.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no balance file, using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<AbilityCatalog> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load the monster table from `monsters.ron`.
    pub fn load_monsters(&self) -> LoadResult<Vec<MonsterDefinition>> {
        MonsterLoader::load(&self.data_dir.join("monsters.ron"))
    }

    /// Load companion profiles from `companions.ron`, or none when the file
    /// does not exist.
    pub fn load_companions(&self) -> LoadResult<Vec<CompanionProfile>> {
        let path = self.data_dir.join("companions.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        CompanionLoader::load(&path)
    }

    /// Load every table and cross-check them into one bundle.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle::new(
            self.load_abilities()?,
            self.load_monsters()?,
            self.load_companions()?,
            self.load_config()?,
        )
        .map_err(|e| anyhow::anyhow!("Invalid content in {}: {}", self.data_dir.display(), e))?;
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
