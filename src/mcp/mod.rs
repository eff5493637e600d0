//! MCP (Model Context Protocol) session client
//!
//! Speaks JSON-RPC 2.0 over HTTP POST to a single endpoint, with replies in
//! either plain JSON or Server-Sent-Events framing. Targets protocol
//! revision **2024-11-05**.
//!
//! # Module Layout
//!
//! - `types`     -- JSON-RPC envelope/response and the MCP payloads used here
//! - `session`   -- Session state and candidate session header names
//! - `decode`    -- Session id extraction and JSON/SSE response decoding
//! - `transport` -- `Transport` trait, HTTP implementation, test fake
//! - `client`    -- The session client and its builder
//! - `probe`     -- `tools/call` parameter-shape exploration

pub mod client;
pub mod decode;
pub mod probe;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{McpClientBuilder, McpSessionClient};
pub use session::{Session, SessionHeaders};
pub use types::*;
