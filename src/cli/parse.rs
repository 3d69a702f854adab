//! CLI parse: clap types for hashsync. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Hashsync CLI - inspect and replay URL fragment state
#[derive(Parser)]
#[command(name = "hashsync")]
#[command(about = "Encode, decode and replay URL fragment attribute state")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a fragment and print its attributes as JSON
    Parse {
        /// Fragment, with or without the leading '#'
        hash: String,
    },
    /// Serialize a JSON object of attributes to a fragment
    Build {
        /// JSON object, e.g. '{"page":"2","debug":null}'
        json: String,
    },
    /// Replay a session of edits and navigations against an in-memory host
    Replay {
        /// Fragment the page was loaded with
        #[arg(long, default_value = "")]
        initial: String,
        /// Steps: set:<pairs>, unset:<key>, navigate:<hash>, scroll:<y>
        #[arg(required = true)]
        steps: Vec<String>,
    },
}
