//! MCP session client
//!
//! [`McpSessionClient`] owns one [`Session`] and one [`Transport`] and runs
//! the request/response cycle the target server expects:
//!
//! 1. `initialize` request with the fixed capability declaration.
//! 2. `initialized` notification, fire-and-forget.
//! 3. An optional settle delay, then the session is marked initialized.
//! 4. `tools/list` and `tools/call` requests, refused locally until step 3.
//!
//! Every outbound message carries `Content-Type`, `Accept` and `Connection`
//! headers, plus the session id under every configured outbound header name
//! once one is known. Every reply is checked for a session id (first-seen
//! wins) before its body is decoded as JSON or SSE.
//!
//! # Concurrency
//!
//! All operations take `&mut self` and complete before returning; there is
//! no pipelining. A client is one logical session. Use one client per
//! session when parallel sessions are needed.

use std::time::Duration;

use serde_json::{json, Value};

use crate::error::{McpError, McpResult};
use crate::mcp::decode::{decode_response, extract_session_id};
use crate::mcp::session::{Session, SessionHeaders};
use crate::mcp::transport::http::{HttpTransport, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::mcp::transport::{InboundResponse, OutboundRequest, Transport};
use crate::mcp::types::{
    CallToolParams, Implementation, InitializeParams, InitializeResult, JsonRpcRequest,
    JsonRpcResponse, ToolListing, METHOD_INITIALIZE, METHOD_INITIALIZED, METHOD_TOOLS_CALL,
    METHOD_TOOLS_LIST,
};

/// Default pause between the `initialized` notification and declaring the
/// session ready. Heuristic; the server gives no acknowledgement to wait on.
pub const DEFAULT_POST_HANDSHAKE_DELAY: Duration = Duration::from_millis(500);

const ACCEPT: &str = "application/json, text/event-stream";

/// Builder for [`McpSessionClient`].
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use mcprobe::mcp::client::McpClientBuilder;
///
/// let client = McpClientBuilder::new()
///     .base_url("http://localhost:8000/api/mcp")
///     .client_info("voice-agent", "1.0.0")
///     .post_handshake_delay(Duration::ZERO)
///     .build()
///     .unwrap();
/// assert!(!client.is_initialized());
/// ```
#[derive(Debug, Clone)]
pub struct McpClientBuilder {
    base_url: String,
    timeout: Duration,
    client_info: Implementation,
    session_headers: SessionHeaders,
    initialized_method: String,
    post_handshake_delay: Duration,
}

impl McpClientBuilder {
    /// Defaults: local endpoint, 30 s timeout, `voice-agent 1.0.0`, the three
    /// compatibility session headers, `initialized`, 500 ms settle delay.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client_info: Implementation::default(),
            session_headers: SessionHeaders::default(),
            initialized_method: METHOD_INITIALIZED.to_string(),
            post_handshake_delay: DEFAULT_POST_HANDSHAKE_DELAY,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn client_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.client_info = Implementation {
            name: name.into(),
            version: version.into(),
        };
        self
    }

    pub fn session_headers(mut self, headers: SessionHeaders) -> Self {
        self.session_headers = headers;
        self
    }

    /// Method name of the post-`initialize` notification.
    pub fn initialized_method(mut self, method: impl Into<String>) -> Self {
        self.initialized_method = method.into();
        self
    }

    /// Settle delay after the handshake. `Duration::ZERO` disables it.
    pub fn post_handshake_delay(mut self, delay: Duration) -> Self {
        self.post_handshake_delay = delay;
        self
    }

    /// Build a client over [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Config`] for an invalid URL or empty header
    /// lists.
    pub fn build(self) -> McpResult<McpSessionClient> {
        let transport = HttpTransport::new(&self.base_url, self.timeout)?;
        self.build_with_transport(Box::new(transport))
    }

    /// Build a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Config`] when the builder settings are unusable.
    pub fn build_with_transport(self, transport: Box<dyn Transport>) -> McpResult<McpSessionClient> {
        self.validate()?;
        Ok(McpSessionClient {
            transport,
            session: Session::new(),
            headers: self.session_headers,
            client_info: self.client_info,
            initialized_method: self.initialized_method,
            post_handshake_delay: self.post_handshake_delay,
            initialize_result: None,
        })
    }

    fn validate(&self) -> McpResult<()> {
        if self.session_headers.outbound.is_empty() || self.session_headers.inbound.is_empty() {
            return Err(McpError::Config(
                "session header lists must not be empty".to_string(),
            ));
        }
        if self
            .session_headers
            .outbound
            .iter()
            .chain(self.session_headers.inbound.iter())
            .any(|name| name.trim().is_empty())
        {
            return Err(McpError::Config(
                "session header names must not be blank".to_string(),
            ));
        }
        if self.initialized_method.trim().is_empty() {
            return Err(McpError::Config(
                "initialized notification method must not be empty".to_string(),
            ));
        }
        if self.client_info.name.trim().is_empty() {
            return Err(McpError::Config("client name must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for McpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A single-session MCP client.
#[derive(Debug)]
pub struct McpSessionClient {
    transport: Box<dyn Transport>,
    session: Session,
    headers: SessionHeaders,
    client_info: Implementation,
    initialized_method: String,
    post_handshake_delay: Duration,
    initialize_result: Option<Value>,
}

impl McpSessionClient {
    /// Start building a client.
    pub fn builder() -> McpClientBuilder {
        McpClientBuilder::new()
    }

    /// Current session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The adopted session id, if the server issued one.
    pub fn session_id(&self) -> Option<&str> {
        self.session.session_id()
    }

    /// Whether the handshake has completed.
    pub fn is_initialized(&self) -> bool {
        self.session.is_initialized()
    }

    /// The endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Raw `result` of the successful `initialize` request.
    pub fn initialize_result(&self) -> Option<&Value> {
        self.initialize_result.as_ref()
    }

    /// Typed view of the `initialize` result, if it has the usual shape.
    pub fn server_info(&self) -> Option<InitializeResult> {
        self.initialize_result
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// The fixed `initialize` parameters for this client's identity.
    pub fn initialize_params(&self) -> InitializeParams {
        InitializeParams::for_client(self.client_info.clone())
    }

    /// Perform the `initialize` / `initialized` handshake.
    ///
    /// Calling this again after success is a no-op.
    ///
    /// # Errors
    ///
    /// - [`McpError::NotInitialized`] carrying the server's error when the
    ///   `initialize` response has an `error` field.
    /// - [`McpError::Transport`] when the `initialize` POST fails.
    /// - [`McpError::NoValidResponse`] when the reply cannot be decoded.
    ///
    /// A failed `initialized` notification is logged and ignored.
    pub async fn initialize_connection(&mut self) -> McpResult<()> {
        if self.session.is_initialized() {
            tracing::debug!("Session already initialized; skipping handshake");
            return Ok(());
        }

        let params = to_params(&self.initialize_params())?;
        tracing::info!(endpoint = %self.transport.endpoint(), "Initializing MCP session");

        let response = self.request(METHOD_INITIALIZE, params).await?;
        let result = response.into_result().map_err(|e| match e {
            McpError::Rpc(rejection) => McpError::NotInitialized(Some(rejection)),
            other => other,
        })?;
        self.initialize_result = Some(result);

        let method = self.initialized_method.clone();
        if let Err(e) = self.notify(&method, json!({})).await {
            tracing::warn!(method = %method, error = %e, "Initialized notification was not delivered; continuing");
        }

        if !self.post_handshake_delay.is_zero() {
            tracing::debug!(
                delay_ms = self.post_handshake_delay.as_millis() as u64,
                "Waiting for the server to finish initialization"
            );
            tokio::time::sleep(self.post_handshake_delay).await;
        }

        self.session.mark_initialized();
        tracing::info!(
            session_id = self.session.session_id().unwrap_or("<none>"),
            "MCP session initialized"
        );
        Ok(())
    }

    /// List the server's tools.
    ///
    /// # Errors
    ///
    /// [`McpError::NotInitialized`] before the handshake (no request is
    /// sent), [`McpError::Rpc`] when the server rejects the call, and
    /// transport/decode errors otherwise.
    pub async fn list_tools(&mut self) -> McpResult<ToolListing> {
        self.ensure_initialized()?;
        let result = self.call(METHOD_TOOLS_LIST, json!({})).await?;
        serde_json::from_value(result)
            .map_err(|e| McpError::NoValidResponse(format!("unexpected tools/list result: {}", e)))
    }

    /// Call `name` with `arguments` and return the response's `result`.
    ///
    /// # Errors
    ///
    /// [`McpError::NotInitialized`] before the handshake (no request is
    /// sent), [`McpError::Rpc`] carrying the server's `code`/`message`/`data`
    /// when the call is rejected, and transport/decode errors otherwise.
    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: serde_json::Map<String, Value>,
    ) -> McpResult<Value> {
        let params = to_params(&CallToolParams {
            name: name.to_string(),
            arguments,
        })?;
        self.call_tool_with_params(params).await
    }

    /// Send `tools/call` with arbitrary `params`.
    ///
    /// Used to explore which parameter shapes a server accepts; production
    /// callers should use [`McpSessionClient::call_tool`].
    ///
    /// # Errors
    ///
    /// Same as [`McpSessionClient::call_tool`].
    pub async fn call_tool_with_params(&mut self, params: Value) -> McpResult<Value> {
        self.ensure_initialized()?;
        self.call(METHOD_TOOLS_CALL, params).await
    }

    /// Send one request and decode its response, without interpreting
    /// `result`/`error`.
    ///
    /// # Errors
    ///
    /// Transport and decode failures only.
    pub async fn request(&mut self, method: &str, params: Value) -> McpResult<JsonRpcResponse> {
        let reply = self.send_raw(method, params, true).await?;
        decode_response(&reply)
    }

    /// Send a notification. The reply body is not decoded.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn notify(&mut self, method: &str, params: Value) -> McpResult<InboundResponse> {
        let reply = self.send_raw(method, params, false).await?;
        if reply.is_success() {
            tracing::debug!(method, status = reply.status, "Notification delivered");
        } else {
            tracing::warn!(
                method,
                status = reply.status,
                body = %reply.body,
                "Server answered notification with an error status"
            );
        }
        Ok(reply)
    }

    /// Build, send and return the raw reply for one envelope.
    ///
    /// Allocates an id when `expects_reply` is true, attaches the transport
    /// and session headers, and adopts a session id from the reply.
    ///
    /// # Errors
    ///
    /// [`McpError::Encode`] when the envelope cannot be serialized and
    /// [`McpError::Transport`] when the POST fails.
    pub async fn send_raw(
        &mut self,
        method: &str,
        params: Value,
        expects_reply: bool,
    ) -> McpResult<InboundResponse> {
        let envelope = if expects_reply {
            JsonRpcRequest::request(self.session.next_request_id(), method, params)
        } else {
            JsonRpcRequest::notification(method, params)
        };
        let body = serde_json::to_string(&envelope)
            .map_err(|e| McpError::Encode(format!("request envelope: {}", e)))?;

        tracing::debug!(
            method,
            id = ?envelope.id,
            session_id = self.session.session_id().unwrap_or("<none>"),
            "Sending MCP message"
        );

        let reply = self
            .transport
            .post(OutboundRequest {
                headers: self.outbound_headers(),
                body,
            })
            .await?;

        self.observe_session_id(&reply);

        tracing::debug!(
            method,
            status = reply.status,
            content_type = reply.content_type(),
            "Received MCP reply"
        );
        Ok(reply)
    }

    async fn call(&mut self, method: &str, params: Value) -> McpResult<Value> {
        let response = self.request(method, params).await?;
        response.into_result()
    }

    fn ensure_initialized(&self) -> McpResult<()> {
        if self.session.is_initialized() {
            Ok(())
        } else {
            Err(McpError::NotInitialized(None))
        }
    }

    fn outbound_headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), ACCEPT.to_string()),
            ("Connection".to_string(), "keep-alive".to_string()),
        ];
        if let Some(session_id) = self.session.session_id() {
            headers.extend(self.headers.outbound_pairs(session_id));
        }
        headers
    }

    fn observe_session_id(&mut self, reply: &InboundResponse) {
        let Some(candidate) = extract_session_id(reply, &self.headers.inbound) else {
            return;
        };
        if self.session.adopt_session_id(&candidate) {
            tracing::info!(session_id = %candidate, "Adopted MCP session id");
        } else if self.session.session_id() != Some(candidate.as_str()) {
            tracing::debug!(ignored = %candidate, "Ignoring different session id; first-seen wins");
        }
    }
}

fn to_params<T: serde::Serialize>(params: &T) -> McpResult<Value> {
    serde_json::to_value(params)
        .map_err(|e| McpError::Encode(format!("params: {}", e)))
}
