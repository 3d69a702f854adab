//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::HashSyncError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &HashSyncError) -> String {
    match e {
        HashSyncError::InvalidStep { .. } => format!(
            "{}\nSteps: set:<pairs>, unset:<key>, navigate:<hash>, scroll:<y>",
            e
        ),
        _ => e.to_string(),
    }
}
