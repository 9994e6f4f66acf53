//! Ability catalog loader.

use std::path::Path;

use battle_core::{AbilityCatalog, AbilityDefinition, GameError};

use crate::loaders::{LoadResult, read_file};

/// Loader for the ability catalog from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load and validate an ability catalog from a RON file.
    ///
    /// RON format: `Vec<AbilityDefinition>`. Signed fields such as
    /// `cooldown` and `duration` are checked here, so a negative value is a
    /// load error rather than a silent clamp.
    pub fn load(path: &Path) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load abilities from {}: {}", path.display(), e))
    }

    /// Parse a catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<AbilityCatalog> {
        let definitions: Vec<AbilityDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;
        AbilityCatalog::from_definitions(definitions)
            .map_err(|e| anyhow::anyhow!("[{}] {}", e.error_code(), e))
    }
}
