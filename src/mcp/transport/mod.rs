//! MCP transport abstraction and implementations
//!
//! The [`Transport`] trait is one exchange: POST a serialized JSON-RPC body
//! with a set of headers and hand back the raw reply (status, headers,
//! body). Framing decisions (JSON vs. SSE) and session tracking stay in the
//! client, so a transport never interprets what it carries.
//!
//! - [`http::HttpTransport`] -- `reqwest` POSTs to a single endpoint.
//! - [`fake::FakeTransport`] -- scripted in-process fake used in tests
//!   (cfg(test) only).

use crate::error::McpResult;

/// An outbound HTTP POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Header name/value pairs in insertion order.
    pub headers: Vec<(String, String)>,
    /// Serialized JSON-RPC envelope.
    pub body: String,
}

impl OutboundRequest {
    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A raw HTTP reply.
///
/// Header names are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, names lower-cased.
    pub headers: Vec<(String, String)>,
    /// Full response body.
    pub body: String,
}

impl InboundResponse {
    /// Build a reply, lower-casing header names.
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v))
                .collect(),
            body: body.into(),
        }
    }

    /// Value of the header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Declared content type, or `""` when absent.
    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or("")
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over the HTTP exchange used by the session client.
///
/// # Errors
///
/// Implementations return [`crate::error::McpError::Transport`] when the
/// request cannot be delivered or the body cannot be read. Non-2xx statuses
/// are not errors at this layer; the body may still carry a JSON-RPC error.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// POST `request` and return the raw reply.
    async fn post(&self, request: OutboundRequest) -> McpResult<InboundResponse>;

    /// Endpoint description for logs.
    fn endpoint(&self) -> &str;
}

pub mod http;

#[cfg(test)]
pub mod fake;
