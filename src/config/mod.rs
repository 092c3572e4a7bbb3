//! Application Configuration
//!
//! Settings stored in TOML format, plus the legacy three-line credentials
//! file used by earlier releases of the results API client.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CheckError;
use crate::slip::Game;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Results API settings
    #[serde(default)]
    pub remote: RemoteSettings,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log filter used when RUST_LOG is not set
    pub log_level: String,
    /// Game assumed when none is given on the command line
    pub default_game: Option<Game>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_game: None,
        }
    }
}

/// Results API endpoint and credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Endpoint URL
    pub url: String,
    /// Application id header value
    pub app_id: String,
    /// Application secret header value
    pub app_secret: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            app_id: String::new(),
            app_secret: String::new(),
            timeout_secs: 5,
        }
    }
}

impl RemoteSettings {
    /// Whether an endpoint has been configured
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a credentials file: endpoint URL, app id and app secret on the
/// first three lines.
pub fn load_credentials(path: &Path, timeout_secs: u64) -> Result<RemoteSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials file {:?}", path))?;
    let lines: Vec<&str> = content.lines().map(str::trim).take(3).collect();
    let [url, app_id, app_secret] = lines.as_slice() else {
        return Err(CheckError::MissingInfo(format!("credentials file {:?} is not complete", path)).into());
    };
    if url.is_empty() || app_id.is_empty() || app_secret.is_empty() {
        return Err(CheckError::MissingInfo(format!("credentials file {:?} has blank lines", path)).into());
    }
    Ok(RemoteSettings {
        url: url.to_string(),
        app_id: app_id.to_string(),
        app_secret: app_secret.to_string(),
        timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.general.log_level, "info");
        assert!(config.general.default_game.is_none());

        assert!(!config.remote.is_configured());
        assert_eq!(config.remote.timeout_secs, 5);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = AppConfig::default();
        config.general.default_game = Some(Game::Cjdlt);
        config.remote.url = "https://example.com/lottery".to_string();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.general.default_game, Some(Game::Cjdlt));
        assert_eq!(parsed.remote, config.remote);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str("[general]\nlog_level = \"debug\"\n").unwrap();
        assert_eq!(parsed.general.log_level, "debug");
        assert_eq!(parsed.remote.timeout_secs, 5);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = AppConfig::default();
        config.remote.timeout_secs = 9;

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(loaded.remote.timeout_secs, 9);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_credentials() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, " https://example.com/api \napp-1\nsecret-1\nignored").unwrap();

        let remote = load_credentials(temp_file.path(), 3).unwrap();
        assert_eq!(remote.url, "https://example.com/api");
        assert_eq!(remote.app_id, "app-1");
        assert_eq!(remote.app_secret, "secret-1");
        assert_eq!(remote.timeout_secs, 3);
    }

    #[test]
    fn test_incomplete_credentials() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "https://example.com/api\napp-1").unwrap();

        let err = load_credentials(temp_file.path(), 5).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CheckError>(),
            Some(CheckError::MissingInfo(_))
        ));
    }
}
