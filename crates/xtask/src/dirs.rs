//! Content directory resolution
//!
//! Resolution order:
//! 1. `--data-dir` flag
//! 2. `BATTLE_DATA_DIR` environment variable (also read from `.env`)
//! 3. `crates/game/content/data` when run from the workspace root
//! 4. The platform data directory:
//!    - macOS: `~/Library/Application Support/battle/content`
//!    - Linux: `~/.local/share/battle/content` (or `$XDG_DATA_HOME/battle/content`)
//!    - Windows: `%APPDATA%\battle\content`

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "BATTLE_DATA_DIR";
const WORKSPACE_DATA_DIR: &str = "crates/game/content/data";

pub fn content_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let workspace = PathBuf::from(WORKSPACE_DATA_DIR);
    if workspace.is_dir() {
        return Ok(workspace);
    }

    directories::ProjectDirs::from("", "", "battle")
        .map(|dirs| dirs.data_dir().join("content"))
        .with_context(|| format!("No content directory found; pass --data-dir or set {DATA_DIR_ENV}"))
}
