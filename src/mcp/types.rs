//! MCP protocol types and JSON-RPC 2.0 primitives
//!
//! Only the slice of the protocol that the session client speaks lives here:
//! the JSON-RPC envelope and response, the fixed `initialize` parameters for
//! revision **2024-11-05**, and the `tools/*` payloads. Struct fields are
//! `camelCase` on the wire via `#[serde(rename_all = "camelCase")]`, and
//! `Option<>` fields are omitted from JSON when `None`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{McpError, McpResult};

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// The protocol revision sent in every `initialize` request.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC version literal.
pub const JSONRPC_VERSION: &str = "2.0";

/// Lifecycle: client sends `initialize` to open a session.
pub const METHOD_INITIALIZE: &str = "initialize";
/// Lifecycle: notification sent once the `initialize` result is processed.
///
/// The target server accepts the bare name; newer MCP servers expect
/// [`METHOD_NOTIFICATIONS_INITIALIZED`]. The client makes this configurable.
pub const METHOD_INITIALIZED: &str = "initialized";
/// Namespaced variant of the `initialized` notification.
pub const METHOD_NOTIFICATIONS_INITIALIZED: &str = "notifications/initialized";
/// Request the list of available tools.
pub const METHOD_TOOLS_LIST: &str = "tools/list";
/// Invoke a named tool.
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// JSON-RPC "Invalid params" error code.
pub const INVALID_PARAMS: i64 = -32602;

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 wire types
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 request or notification envelope.
///
/// `id` is `Some` for requests that expect a reply and `None` for
/// notifications; it is omitted from the serialized form when `None`.
///
/// # Examples
///
/// ```
/// use mcprobe::mcp::types::JsonRpcRequest;
///
/// let req = JsonRpcRequest::request(1, "tools/list", serde_json::json!({}));
/// assert!(!req.is_notification());
///
/// let note = JsonRpcRequest::notification("initialized", serde_json::json!({}));
/// let json = serde_json::to_value(&note).unwrap();
/// assert!(json.get("id").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version identifier; always `"2.0"`.
    pub jsonrpc: String,
    /// The method name to invoke.
    pub method: String,
    /// Method parameters.
    pub params: serde_json::Value,
    /// Request correlation identifier. Absent for notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl JsonRpcRequest {
    /// Build a request that expects a response with the given `id`.
    pub fn request(id: u64, method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: Some(id),
        }
    }

    /// Build a notification (no `id`, no response expected).
    pub fn notification(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: None,
        }
    }

    /// Whether this envelope is a notification.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// A JSON-RPC 2.0 response object.
///
/// Exactly one of `result` or `error` is present in a valid response. A
/// server request or notification deserializes into this type too, with
/// both missing; [`JsonRpcResponse::is_response`] tells them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version identifier; always `"2.0"`.
    pub jsonrpc: String,
    /// Mirrors the `id` from the corresponding request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    /// Successful result value; mutually exclusive with `error`.
    ///
    /// `"result": null` is `Some(Value::Null)`; only an absent field is `None`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<serde_json::Value>,
    /// Error object; mutually exclusive with `result`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Whether the message carries a `result` or an `error`.
    pub fn is_response(&self) -> bool {
        self.result.is_some() || self.error.is_some()
    }

    /// Split the response into its result or error.
    ///
    /// # Errors
    ///
    /// [`McpError::Rpc`] when the server sent an `error`, and
    /// [`McpError::NoValidResponse`] when the message has neither field.
    pub fn into_result(self) -> McpResult<serde_json::Value> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(McpError::Rpc(error)),
            (Some(result), None) => Ok(result),
            (None, None) => Err(McpError::NoValidResponse(
                "message carries neither result nor error".to_string(),
            )),
        }
    }
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// A JSON-RPC 2.0 error object.
///
/// Implements `Display` as `"JSON-RPC error {code}: {message}"`.
///
/// # Examples
///
/// ```
/// use mcprobe::mcp::types::JsonRpcError;
///
/// let e = JsonRpcError { code: -32602, message: "Invalid params".to_string(), data: None };
/// assert_eq!(e.to_string(), "JSON-RPC error -32602: Invalid params");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code as defined by JSON-RPC 2.0 or MCP.
    pub code: i64,
    /// Human-readable error description.
    pub message: String,
    /// Optional additional error context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

// ---------------------------------------------------------------------------
// Initialize types
// ---------------------------------------------------------------------------

/// Identifies a client or server implementation by name and version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    /// Short name of the implementation (e.g. `"voice-agent"`).
    pub name: String,
    /// Version string (e.g. `"1.0.0"`).
    pub version: String,
}

impl Default for Implementation {
    fn default() -> Self {
        Self {
            name: "voice-agent".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

/// `listChanged` capability flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListChangedCapability {
    pub list_changed: bool,
}

/// Resource capability flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapability {
    pub subscribe: bool,
    pub list_changed: bool,
}

/// Capabilities the client advertises during `initialize`.
///
/// The default value is the declaration the target server expects:
///
/// ```
/// use mcprobe::mcp::types::ClientCapabilities;
///
/// let json = serde_json::to_value(ClientCapabilities::default()).unwrap();
/// assert_eq!(json, serde_json::json!({
///     "experimental": {},
///     "prompts": {"listChanged": true},
///     "resources": {"subscribe": false, "listChanged": true},
///     "tools": {"listChanged": true}
/// }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientCapabilities {
    pub experimental: serde_json::Map<String, serde_json::Value>,
    pub prompts: ListChangedCapability,
    pub resources: ResourcesCapability,
    pub tools: ListChangedCapability,
}

impl Default for ClientCapabilities {
    fn default() -> Self {
        Self {
            experimental: serde_json::Map::new(),
            prompts: ListChangedCapability { list_changed: true },
            resources: ResourcesCapability {
                subscribe: false,
                list_changed: true,
            },
            tools: ListChangedCapability { list_changed: true },
        }
    }
}

/// Parameters sent by the client in the `initialize` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// The protocol version the client wishes to use.
    pub protocol_version: String,
    /// Capabilities advertised by this client.
    pub capabilities: ClientCapabilities,
    /// Information identifying this client implementation.
    pub client_info: Implementation,
}

impl InitializeParams {
    /// The fixed `initialize` parameters for the given client identity.
    pub fn for_client(client_info: Implementation) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ClientCapabilities::default(),
            client_info,
        }
    }
}

/// The parts of an `initialize` result worth reporting.
///
/// Every field is optional; servers vary and the client never rejects an
/// `initialize` result for its shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// The protocol version the server selected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    /// Server identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_info: Option<Implementation>,
    /// Server capabilities, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<serde_json::Value>,
    /// Optional usage instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

// ---------------------------------------------------------------------------
// Tool types
// ---------------------------------------------------------------------------

/// A tool definition as returned by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    /// Unique name of the tool within the server.
    pub name: String,
    /// Human-readable description of the tool's purpose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema describing the tool's input parameters.
    #[serde(default)]
    pub input_schema: serde_json::Value,
}

/// Result of a `tools/list` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolListing {
    /// Tools advertised by the server.
    #[serde(default)]
    pub tools: Vec<McpTool>,
    /// Opaque cursor for the next page, if the server paginates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Parameters for a `tools/call` request.
///
/// The nested `arguments` object is the only shape the target server
/// accepts.
///
/// ```
/// use mcprobe::mcp::types::CallToolParams;
///
/// let params = CallToolParams {
///     name: "monday_list_boards".to_string(),
///     arguments: serde_json::json!({"limit": 10}).as_object().unwrap().clone(),
/// };
/// let json = serde_json::to_value(&params).unwrap();
/// assert_eq!(json["arguments"]["limit"], 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Name of the tool to invoke.
    pub name: String,
    /// Arguments to pass to the tool.
    pub arguments: serde_json::Map<String, serde_json::Value>,
}
