//! Storage Layer
//!
//! Locates the per-user directory holding `config.toml`.

use anyhow::Result;
use std::path::PathBuf;

/// File name of the settings file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "lotterychecker", "LotteryChecker")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Default location of the settings file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}
