//! Configuration management for moodcap.
//!
//! A single TOML file under the user config directory. Defaults are skipped
//! on save so the file only shows what the user changed.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{APP_NAME, DEFAULT_ENDPOINT};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Predictor endpoint that accepts the audio upload.
    #[serde(
        default = "default_endpoint",
        skip_serializing_if = "is_default_endpoint"
    )]
    pub endpoint: String,

    /// Audio file served by the "Open audio file" menu entry. When unset,
    /// opening a file behaves like a cancelled pick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_file: Option<PathBuf>,

    /// Hotkey specification, e.g. "super+shift+KeyM".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotkey: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn is_default_endpoint(endpoint: &String) -> bool {
    endpoint == DEFAULT_ENDPOINT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            open_file: None,
            hotkey: None,
        }
    }
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new ConfigManager with the default configuration directory.
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Ok(Self { config_path })
    }

    /// Creates a new ConfigManager with a specified configuration directory.
    #[cfg(test)]
    pub fn with_config_dir<P: AsRef<std::path::Path>>(dir: P) -> Self {
        let config_path = dir.as_ref().join(format!("{}.toml", APP_NAME));
        Self { config_path }
    }

    /// Returns the default path to the configuration file.
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to retrieve configuration directory")?;
        Ok(config_dir.join(APP_NAME).join(format!("{}.toml", APP_NAME)))
    }

    /// Loads the configuration from the config file or returns default.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let config_content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file at {:?}", self.config_path))?;

        let config: Config = toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file at {:?}", self.config_path))?;

        if let Some(open_file) = &config.open_file {
            if !open_file.exists() {
                warn!(
                    path = %open_file.display(),
                    "configured open_file does not exist; opening a file will fail"
                );
            }
        }

        Ok(config)
    }

    /// Saves the configuration to the config file.
    pub fn save(&self, config: &Config) -> Result<()> {
        let config_dir = self
            .config_path
            .parent()
            .with_context(|| format!("Failed to get parent directory of {:?}", self.config_path))?;

        fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config directory at {:?}", config_dir))?;

        let serialized =
            toml::to_string_pretty(&config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, serialized)
            .with_context(|| format!("Failed to write config file at {:?}", self.config_path))?;

        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path(&self) -> &std::path::Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.open_file.is_none());
        assert!(config.hotkey.is_none());
    }

    #[test]
    fn test_load_default_config() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());

        let config = Config {
            endpoint: "http://predictor.example.com/predictor".to_string(),
            hotkey: Some("super+shift+KeyM".to_string()),
            ..Default::default()
        };
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_creates_config_file() {
        let temp = tempdir().expect("Failed to create temp dir");
        let manager = ConfigManager::with_config_dir(temp.path());

        manager.save(&Config::default()).unwrap();
        assert!(manager.config_path().exists());
    }

    #[test]
    fn test_default_fields_are_skipped_on_save() {
        let serialized = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(serialized.trim(), "");

        let custom = Config {
            endpoint: "http://10.0.0.5:8000/predictor".to_string(),
            ..Default::default()
        };
        let serialized = toml::to_string_pretty(&custom).unwrap();
        assert!(serialized.contains("endpoint"));
        assert!(!serialized.contains("hotkey"));
    }
}
