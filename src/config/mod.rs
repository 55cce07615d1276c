//! User-level configuration loaded from `$GAMIFIER_HOME/config.toml`.
//!
//! The file is optional; if it does not exist every field falls back to its
//! `Default` value. Command-line flags override what is loaded here.

use crate::context::{
    ContentDefaults, DEFAULT_CYCLE_DURATION_SECONDS, DEFAULT_LANGUAGE,
};
use crate::utils::gamifier_home;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILENAME: &str = "config.toml";
pub const STORE_FILENAME: &str = "gamifier.db";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// `[store]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Database file. Defaults to `$GAMIFIER_HOME/gamifier.db`.
    pub path: Option<PathBuf>,
}

/// `[editor]` section: defaults for new questions and cycles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub default_language: String,
    pub default_cycle_duration_seconds: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            default_cycle_duration_seconds: DEFAULT_CYCLE_DURATION_SECONDS,
        }
    }
}

/// `[folders]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FolderConfig {
    /// Human-readable duration, e.g. `30d` or `12h`.
    pub deleted_grace_period: String,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            deleted_grace_period: "30d".to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    /// `daily`, `hourly` or `never`.
    pub rotation: String,
    /// Defaults to `$GAMIFIER_HOME/logs`.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            rotation: "daily".to_string(),
            dir: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdminConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub folders: FolderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AdminConfig {
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| gamifier_home().join(STORE_FILENAME))
    }

    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.logging
            .dir
            .clone()
            .unwrap_or_else(|| gamifier_home().join("logs"))
    }

    pub fn folder_grace_period(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.folders.deleted_grace_period)
    }

    /// Defaults handed to the services.
    pub fn content_defaults(&self) -> Result<ContentDefaults, ConfigError> {
        Ok(ContentDefaults {
            language: self.editor.default_language.clone(),
            cycle_duration_seconds: self.editor.default_cycle_duration_seconds,
            folder_grace_period: self.folder_grace_period()?,
        })
    }
}

fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::InvalidDuration {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Canonical config path (`$GAMIFIER_HOME/config.toml`).
#[must_use]
pub fn config_path() -> PathBuf {
    gamifier_home().join(CONFIG_FILENAME)
}

/// Load the configuration from [`config_path`].
pub fn load_config() -> Result<AdminConfig, ConfigError> {
    load_config_from(&config_path())
}

/// Load the configuration from `path`, returning defaults if it is absent.
///
/// The grace period is validated here so a bad value fails at startup.
pub fn load_config_from(path: &Path) -> Result<AdminConfig, ConfigError> {
    if !path.exists() {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(AdminConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: AdminConfig = toml::from_str(&content)?;
    config.folder_grace_period()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
