//! Configuration file management.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather/geocoding API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Override for the weather service base URL
    #[serde(default)]
    pub weather_url: Option<String>,

    /// Override for the geocoding service base URL
    #[serde(default)]
    pub geocoding_url: Option<String>,

    /// Override for the IP position service base URL
    #[serde(default)]
    pub position_url: Option<String>,

    /// Override for the database path
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nimbus")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let path = Self::path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// The database path: configured override or platform default
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(nimbus_store::default_db_path)
    }
}

/// Resolve the API key: CLI flag (or env var via clap), then config file.
pub fn resolve_api_key(flag: Option<&str>, config: &Config) -> Result<String> {
    flag.map(|k| k.to_string())
        .or_else(|| config.api_key.clone())
        .context(
            "No API key configured. Set NIMBUS_API_KEY, pass --api-key, \
             or add api_key to the config file.",
        )
}
