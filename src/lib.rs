//! mcprobe - MCP session client library
//!
//! This library provides a client for Model Context Protocol servers reached
//! over HTTP POST, where each reply may be plain JSON or a Server-Sent-Events
//! stream and the session is identified by a server-issued header.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `mcp`: Session client, wire types, response decoding, transport
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Handlers behind each CLI subcommand
//!
//! # Example
//!
//! ```no_run
//! use mcprobe::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let mut client = config.client_builder().build()?;
//!     client.initialize_connection().await?;
//!     let tools = client.list_tools().await?;
//!     println!("{} tools", tools.tools.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod mcp;

// Re-export commonly used types
pub use config::Config;
pub use error::{McpError, McpResult, ProbeError, Result};
pub use mcp::{McpClientBuilder, McpSessionClient};
