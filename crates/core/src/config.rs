//! Application configuration.
//!
//! Loaded from `config.toml` in the user config directory, with `TAVLE_*`
//! environment variables taking precedence.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_API_URL: &str = "https://api.entur.io/journey-planner/v2/graphql";
const DEFAULT_CLIENT_NAME: &str = "tavle-tui";

const DEFAULT_CONFIG: &str = r#"# tavle configuration

# GraphQL endpoint for the journey planner.
# api_url = "https://api.entur.io/journey-planner/v2/graphql"

# Sent as the ET-Client-Name header; identify yourself to the API.
# client_name = "tavle-tui"

# Board URL carrying the viewer position as an @lat,lon fragment.
# board_url = "https://tavla.example.org/t/@59.911491,10.757933"

# Serve stations from a local JSON document instead of the network.
# offline_data = "/path/to/stations.json"
"#;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GraphQL endpoint for the journey planner.
    pub api_url: String,
    /// Value sent as the `ET-Client-Name` header.
    pub client_name: String,
    /// Board URL carrying the viewer position as an `@lat,lon` fragment.
    pub board_url: String,
    /// When set, stations are served from this JSON document instead of
    /// the network.
    pub offline_data: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            board_url: String::new(),
            offline_data: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path()?)
    }

    fn load_from(path: PathBuf) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("TAVLE"))
            .build()
            .context("failed to read configuration")?;
        cfg.try_deserialize()
            .context("failed to deserialize configuration")
    }
}

/// Directory holding the config and settings files.
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .context("no config directory on this platform")
        .map(|dir| dir.join("tavle"))
}

/// Path to `config.toml`.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Path to the user settings file.
pub fn settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.json"))
}

/// Write a commented default config file on first run.
pub fn ensure_default_config() -> Result<()> {
    let path = config_path()?;
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write default config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("config.toml"))?;
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.client_name, DEFAULT_CLIENT_NAME);
        assert!(config.offline_data.is_none());
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
client_name = "my-board"
board_url = "https://tavla.example.org/t/@59.911491,10.757933"
"#,
        )?;
        let config = AppConfig::load_from(path)?;
        assert_eq!(config.client_name, "my-board");
        assert!(config.board_url.contains("@59.911491"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        Ok(())
    }
}
