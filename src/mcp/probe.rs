//! Parameter-shape exploration for `tools/call`
//!
//! Servers disagree about where tool arguments go. [`run_probe`] sends the
//! same logical call in every [`ArgumentShape`] over one initialized session
//! and reports what the server did with each. Only
//! [`ArgumentShape::Nested`] is the format the session client uses in
//! production; the rest exist to reproduce the failure modes.

use std::fmt;

use serde_json::{json, Map, Value};

use crate::error::McpError;
use crate::mcp::client::McpSessionClient;
use crate::mcp::types::JsonRpcError;

/// One way of placing tool arguments in `tools/call` params.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentShape {
    /// `{name, arguments: {...}}`
    Nested,
    /// `{name, ...arguments}`
    Flattened,
    /// `{name, arguments: {}}`
    EmptyArguments,
    /// `{name}`
    OmittedArguments,
}

impl ArgumentShape {
    /// Every shape, in the order they are probed.
    pub const ALL: [ArgumentShape; 4] = [
        ArgumentShape::Nested,
        ArgumentShape::Flattened,
        ArgumentShape::EmptyArguments,
        ArgumentShape::OmittedArguments,
    ];

    /// Build the `params` value for `tool` in this shape.
    ///
    /// A flattened argument named `name` is dropped so it cannot overwrite
    /// the tool name.
    ///
    /// # Examples
    ///
    /// ```
    /// use mcprobe::mcp::probe::ArgumentShape;
    ///
    /// let args = serde_json::json!({"limit": 10}).as_object().unwrap().clone();
    /// let params = ArgumentShape::Flattened.params("monday_list_boards", &args);
    /// assert_eq!(params, serde_json::json!({"name": "monday_list_boards", "limit": 10}));
    /// ```
    pub fn params(&self, tool: &str, arguments: &Map<String, Value>) -> Value {
        match self {
            ArgumentShape::Nested => json!({"name": tool, "arguments": arguments}),
            ArgumentShape::Flattened => {
                let mut params = Map::new();
                params.insert("name".to_string(), Value::String(tool.to_string()));
                for (key, value) in arguments {
                    if key != "name" {
                        params.insert(key.clone(), value.clone());
                    }
                }
                Value::Object(params)
            }
            ArgumentShape::EmptyArguments => json!({"name": tool, "arguments": {}}),
            ArgumentShape::OmittedArguments => json!({"name": tool}),
        }
    }

    /// Short description for reports.
    pub fn describe(&self) -> &'static str {
        match self {
            ArgumentShape::Nested => "nested arguments object",
            ArgumentShape::Flattened => "flattened parameters",
            ArgumentShape::EmptyArguments => "empty arguments object",
            ArgumentShape::OmittedArguments => "no arguments field",
        }
    }
}

impl fmt::Display for ArgumentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// What the server did with one shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// The server returned a `result`.
    Accepted(Value),
    /// The server returned a JSON-RPC `error`.
    Rejected(JsonRpcError),
    /// The exchange failed below the JSON-RPC layer.
    Failed(String),
}

impl ProbeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ProbeOutcome::Accepted(_))
    }
}

/// One row of a probe report.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    pub shape: ArgumentShape,
    pub params: Value,
    pub outcome: ProbeOutcome,
}

/// Call `tool` once per [`ArgumentShape`] on an initialized client.
///
/// Each shape is independent: a rejection or failure in one does not stop
/// the others.
///
/// # Errors
///
/// Returns [`McpError::NotInitialized`] without sending anything when the
/// client has not completed its handshake.
pub async fn run_probe(
    client: &mut McpSessionClient,
    tool: &str,
    arguments: &Map<String, Value>,
) -> Result<Vec<ProbeReport>, McpError> {
    if !client.is_initialized() {
        return Err(McpError::NotInitialized(None));
    }

    let mut reports = Vec::with_capacity(ArgumentShape::ALL.len());
    for shape in ArgumentShape::ALL {
        let params = shape.params(tool, arguments);
        let outcome = match client.call_tool_with_params(params.clone()).await {
            Ok(result) => ProbeOutcome::Accepted(result),
            Err(McpError::Rpc(e)) => ProbeOutcome::Rejected(e),
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        };
        tracing::info!(shape = %shape, accepted = outcome.is_accepted(), "Probed tools/call shape");
        reports.push(ProbeReport {
            shape,
            params,
            outcome,
        });
    }
    Ok(reports)
}
