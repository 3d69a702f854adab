//! Error types for the hashsync fragment store.
//!
//! The synchronization core itself never fails: malformed fragments degrade to
//! null-valued or ignored keys. Errors only surface at the edges, when a caller
//! hands the store a key that cannot be written to the fragment, or when
//! configuration, logging or CLI input is bad.

use thiserror::Error;

/// Errors raised by the store API, configuration loading and the CLI.
#[derive(Debug, Error)]
pub enum HashSyncError {
    #[error("Invalid attribute key {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid replay step {step:?}: {reason}")]
    InvalidStep { step: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for HashSyncError {
    fn from(err: config::ConfigError) -> Self {
        HashSyncError::ConfigError(err.to_string())
    }
}

impl HashSyncError {
    pub(crate) fn invalid_step(step: &str, reason: impl Into<String>) -> Self {
        HashSyncError::InvalidStep {
            step: step.to_string(),
            reason: reason.into(),
        }
    }
}
