//! Error types for mcprobe
//!
//! Two layers live here. [`McpError`] is the typed failure returned by every
//! MCP client operation, so callers can tell "the network failed" apart from
//! "the server rejected the call". [`ProbeError`] covers the application
//! layer (configuration, CLI commands) and is carried inside
//! `anyhow::Error` the same way the rest of the binary propagates errors.

use thiserror::Error;

use crate::mcp::types::JsonRpcError;

/// Failure of a single MCP client operation.
///
/// None of these are retried inside the client; the retry policy belongs to
/// the caller.
#[derive(Error, Debug, Clone)]
pub enum McpError {
    /// HTTP or network failure (connection refused, timeout, unreadable body)
    #[error("MCP transport error: {0}")]
    Transport(String),

    /// Response body could not be parsed as JSON-RPC in either framing
    #[error("No valid response: {0}")]
    NoValidResponse(String),

    /// The server answered with a well-formed JSON-RPC `error` object
    #[error("MCP server rejected the request: {0}")]
    Rpc(JsonRpcError),

    /// The handshake has not completed.
    ///
    /// Carries the server's error when the `initialize` request itself was
    /// rejected; `None` when a tool operation was attempted too early.
    #[error("MCP session not initialized{}", describe_rejection(.0))]
    NotInitialized(Option<JsonRpcError>),

    /// Invalid client construction input (bad URL, empty header list, ...)
    #[error("MCP client configuration error: {0}")]
    Config(String),

    /// Request params or envelope could not be serialized to JSON
    #[error("Failed to encode MCP request: {0}")]
    Encode(String),
}

fn describe_rejection(error: &Option<JsonRpcError>) -> String {
    match error {
        Some(e) => format!(": initialize rejected ({})", e),
        None => String::new(),
    }
}

impl McpError {
    /// The JSON-RPC error code, when the server produced one.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            McpError::Rpc(e) | McpError::NotInitialized(Some(e)) => Some(e.code),
            _ => None,
        }
    }

    /// True when the failure happened below the JSON-RPC layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, McpError::Transport(_))
    }
}

/// Result alias for MCP client operations.
pub type McpResult<T> = std::result::Result<T, McpError>;

/// Application-level error type
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line input (e.g. malformed `--args` JSON)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// MCP client errors
    #[error(transparent)]
    Mcp(#[from] McpError),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for application-level operations
///
/// Uses `anyhow::Error` so commands can attach context; MCP failures remain
/// reachable through `downcast_ref::<McpError>()`.
pub type Result<T> = anyhow::Result<T>;
