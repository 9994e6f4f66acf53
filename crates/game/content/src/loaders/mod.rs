//! Content loaders for reading battle data from files.
//!
//! Every loader parses into battle-core types directly and fails fast: a
//! malformed entry aborts the whole file with the offending id in the error.

pub mod abilities;
pub mod companions;
pub mod config;
pub mod factory;
pub mod monsters;

pub use abilities::AbilityLoader;
pub use companions::CompanionLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use monsters::MonsterLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
