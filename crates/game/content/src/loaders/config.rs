//! Balance configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for balance configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load balance data from a TOML file.
    ///
    /// Every section and field is optional; anything missing keeps its
    /// built-in default.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse balance TOML: {}", e))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            [escape]
            max_attempts = 5

            [limits]
            max_rounds = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.escape.max_attempts, 5);
        assert_eq!(config.escape.cooldown_rounds, 2);
        assert_eq!(config.limits.max_rounds, 20);
        assert_eq!(config.hit, BattleConfig::default().hit);
    }

    #[test]
    fn empty_file_is_the_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), BattleConfig::default());
    }
}
