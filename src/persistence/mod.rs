pub mod config;

use std::path::PathBuf;

/// Get or create the graphcalc config directory (~/.config/graphcalc/).
pub fn config_dir() -> Option<PathBuf> {
    let dir = dirs::config_dir()?.join("graphcalc");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
