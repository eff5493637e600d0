//! Command-line interface definition for mcprobe
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for running the session sequence and for poking at
//! individual tools.

use clap::{Parser, Subcommand};

/// Tool called by `sequence` when none is given.
pub const DEFAULT_SEQUENCE_TOOL: &str = "monday_list_boards";

/// Arguments used with [`DEFAULT_SEQUENCE_TOOL`].
pub const DEFAULT_SEQUENCE_ARGS: &str = r#"{"limit":10,"page":1}"#;

/// mcprobe - MCP session client and diagnostics
///
/// Runs the initialize handshake against an HTTP MCP endpoint, keeps the
/// session id the server hands out, and calls tools over that session.
#[derive(Parser, Debug, Clone)]
#[command(name = "mcprobe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Override the MCP endpoint URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Override the post-handshake delay in milliseconds
    #[arg(long)]
    pub handshake_delay_ms: Option<u64>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for mcprobe
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize, list tools, then call one tool over the same session
    Sequence {
        /// Tool to call after listing
        #[arg(short, long, default_value = DEFAULT_SEQUENCE_TOOL)]
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = DEFAULT_SEQUENCE_ARGS)]
        args: String,
    },

    /// List the tools the server exposes
    Tools {
        /// Print the raw tools/list result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call a single tool
    Call {
        /// Tool name
        name: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Try every tools/call parameter shape for one tool
    Probe {
        /// Tool name
        name: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Send only `initialize` and show the raw reply
    Inspect,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            url: None,
            handshake_delay_ms: None,
            command: Commands::Inspect,
        }
    }
}
