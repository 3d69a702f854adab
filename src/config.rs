//! Configuration System
//!
//! Layered configuration for the store and its logging. Sources, lowest to
//! highest priority: built-in defaults, the config file (explicit path or
//! `$XDG_CONFIG_HOME/hashsync/config.toml`), then `HASHSYNC_*` environment
//! variables (`HASHSYNC_STORE__PRESERVE_SCROLL_ON_EMPTY=false`).

use crate::error::HashSyncError;
use crate::logging::LoggingConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashSyncConfig {
    /// Store behaviour
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Restore the scroll offset around writes that clear the fragment
    #[serde(default = "default_true")]
    pub preserve_scroll_on_empty: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            preserve_scroll_on_empty: default_true(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl HashSyncConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Path to the user-level config file, if a home directory can be resolved.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hashsync").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Loads [`HashSyncConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load using the user-level config file when it exists.
    pub fn load() -> Result<HashSyncConfig, HashSyncError> {
        let path = global_config_path();
        Self::load_layers(path.as_deref(), false)
    }

    /// Load using an explicit config file, which must exist.
    pub fn load_from_file(path: &Path) -> Result<HashSyncConfig, HashSyncError> {
        Self::load_layers(Some(path), true)
    }

    fn load_layers(path: Option<&Path>, required: bool) -> Result<HashSyncConfig, HashSyncError> {
        let mut builder = builder_with_defaults()?;

        if let Some(path) = path {
            if required || path.exists() {
                debug!(config_path = %path.display(), "Adding config file source");
                builder = builder.add_source(File::from(path).required(required));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("HASHSYNC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: HashSyncConfig = builder.build()?.try_deserialize()?;

        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            HashSyncError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;

        Ok(config)
    }
}

/// Create a Config builder with defaults applied.
fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let logging = LoggingConfig::default();
    Config::builder()
        .set_default("store.preserve_scroll_on_empty", true)?
        .set_default("logging.enabled", logging.enabled)?
        .set_default("logging.level", logging.level)?
        .set_default("logging.format", logging.format)?
        .set_default("logging.output", logging.output)?
        .set_default("logging.color", logging.color)
}
