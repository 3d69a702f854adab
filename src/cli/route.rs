//! CLI route: single route table and run context.

use std::path::PathBuf;

use tracing::info;

use crate::attributes::Attributes;
use crate::cli::parse::Commands;
use crate::cli::replay::{replay, ReplayStep};
use crate::codec;
use crate::config::{ConfigLoader, HashSyncConfig};
use crate::error::HashSyncError;
use crate::store::validate_key;

/// Runtime context for CLI execution. Built from the optional config path
/// using ConfigLoader only.
pub struct RunContext {
    config: HashSyncConfig,
}

impl RunContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, HashSyncError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: HashSyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HashSyncConfig {
        &self.config
    }

    /// Run a command and return its stdout payload.
    pub fn execute(&self, command: &Commands) -> Result<String, HashSyncError> {
        match command {
            Commands::Parse { hash } => {
                let attributes = codec::parse(hash);
                info!(keys = attributes.len(), "Parsed fragment");
                Ok(serde_json::to_string_pretty(&attributes)?)
            }
            Commands::Build { json } => {
                let attributes: Attributes = serde_json::from_str(json)?;
                for key in attributes.keys() {
                    validate_key(key)?;
                }
                Ok(codec::serialize(&attributes))
            }
            Commands::Replay { initial, steps } => {
                let steps = steps
                    .iter()
                    .map(|step| step.parse::<ReplayStep>())
                    .collect::<Result<Vec<_>, _>>()?;
                let report = replay(initial, &steps, self.config.store.clone())?;
                info!(
                    steps = steps.len(),
                    events = report.events.len(),
                    "Replay finished"
                );
                Ok(serde_json::to_string_pretty(&report)?)
            }
        }
    }
}
