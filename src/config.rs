//! Application configuration
//!
//! Loaded once at startup from `~/.wms-tui/config.json`. An absent file
//! falls back to defaults; a malformed file is a fatal startup error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the XML server registry file
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,
    /// Path the downloaded map image is written to
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

fn default_registry_path() -> PathBuf {
    Config::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ServersList.xml")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("map.png")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
            output_path: default_output_path(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".wms-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Where diagnostics are logged
    pub fn log_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("wms-tui.log"))
    }

    /// Load the config, using defaults when no file exists.
    ///
    /// A file that exists but does not parse is an error; the caller
    /// treats that as fatal.
    pub fn load() -> Result<Config> {
        let Some(config_path) = Self::config_path() else {
            return Ok(Config::default());
        };
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("malformed config file: {}", config_path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let config = Config::default();
        assert_eq!(config.output_path, PathBuf::from("map.png"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"output_path": "out.png"}"#).unwrap();
        assert_eq!(config.output_path, PathBuf::from("out.png"));
        assert!(config.registry_path.ends_with("ServersList.xml"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let result = serde_json::from_str::<Config>("{not json");
        assert!(result.is_err());
    }
}
