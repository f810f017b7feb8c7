//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Dictaphone - voice memo recorder
#[derive(Parser, Debug)]
#[command(name = "dictaphone")]
#[command(version)]
#[command(about = "Record, play back, and manage voice memos")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new voice memo (stop with Enter or Ctrl-C)
    Record,
    /// List saved recordings
    List,
    /// Play a recording (Ctrl-C stops early)
    Play {
        /// Recording id, as shown by `list`
        id: String,
    },
    /// Delete a recording and its audio file
    Delete {
        /// Recording id, as shown by `list`
        id: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Show the config file path
    Path,
}
