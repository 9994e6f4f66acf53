//! Monster table loader.

use std::path::Path;

use crate::bundle::MonsterDefinition;
use crate::loaders::{LoadResult, read_file};

/// Loader for monster definitions from RON files.
///
/// Cross-references (abilities, drop rates) are checked when the table is
/// assembled into a [`ContentBundle`](crate::ContentBundle).
pub struct MonsterLoader;

impl MonsterLoader {
    /// Load monster definitions from a RON file.
    ///
    /// RON format: `Vec<MonsterDefinition>`
    pub fn load(path: &Path) -> LoadResult<Vec<MonsterDefinition>> {
        let content = read_file(path)?;
        let monsters: Vec<MonsterDefinition> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse monster table RON: {}", e))?;

        Ok(monsters)
    }
}
