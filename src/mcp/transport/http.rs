//! HTTP transport for MCP
//!
//! [`HttpTransport`] POSTs every JSON-RPC message to one endpoint and returns
//! the status, headers and full body. The server may answer with
//! `application/json`, with `text/event-stream`, or with an empty `202`
//! acknowledgement; deciding which is the client's job.
//!
//! The endpoint is normalized so that it ends with exactly one `/`, matching
//! how the target server mounts its MCP route.

use std::time::Duration;

use crate::error::{McpError, McpResult};
use crate::mcp::transport::{InboundResponse, OutboundRequest, Transport};

/// Default endpoint of the target server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/mcp/";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Normalize `base_url` to end with exactly one trailing slash.
///
/// # Errors
///
/// Returns [`McpError::Config`] when the URL does not parse or is not
/// `http`/`https`.
///
/// # Examples
///
/// ```
/// use mcprobe::mcp::transport::http::normalize_base_url;
///
/// let url = normalize_base_url("http://localhost:8000/api/mcp///").unwrap();
/// assert_eq!(url.as_str(), "http://localhost:8000/api/mcp/");
/// ```
pub fn normalize_base_url(base_url: &str) -> McpResult<url::Url> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let candidate = format!("{}/", trimmed);
    let url = url::Url::parse(&candidate)
        .map_err(|e| McpError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(McpError::Config(format!(
            "unsupported URL scheme '{}' in '{}'",
            other, base_url
        ))),
    }
}

/// `reqwest`-backed transport.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use mcprobe::mcp::transport::http::HttpTransport;
///
/// let transport = HttpTransport::new("http://localhost:8000/api/mcp", Duration::from_secs(30))
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpTransport {
    /// Construct a transport targeting `base_url`.
    ///
    /// No network I/O is performed at construction time.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Config`] for an invalid URL and
    /// [`McpError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> McpResult<Self> {
        let endpoint = normalize_base_url(base_url)?;
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| McpError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// The normalized endpoint URL.
    pub fn url(&self) -> &url::Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: OutboundRequest) -> McpResult<InboundResponse> {
        let mut req = self.http_client.post(self.endpoint.as_str());
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let response = req
            .body(request.body)
            .send()
            .await
            .map_err(|e| McpError::Transport(format!("HTTP POST failed: {}", e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect::<Vec<_>>();

        let body = response
            .text()
            .await
            .map_err(|e| McpError::Transport(format!("failed to read response body: {}", e)))?;

        tracing::debug!(status, bytes = body.len(), "Received HTTP reply");

        Ok(InboundResponse::new(status, headers, body))
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}
