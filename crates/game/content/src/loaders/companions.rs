//! Companion profile loader.

use std::path::Path;

use battle_core::CompanionProfile;

use crate::loaders::{LoadResult, read_file};

/// Loader for companion profiles from RON files.
pub struct CompanionLoader;

impl CompanionLoader {
    /// Load companion profiles from a RON file.
    ///
    /// RON format: `Vec<CompanionProfile>`
    pub fn load(path: &Path) -> LoadResult<Vec<CompanionProfile>> {
        let content = read_file(path)?;
        let companions: Vec<CompanionProfile> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse companion RON: {}", e))?;

        Ok(companions)
    }
}
