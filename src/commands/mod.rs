//! Command handlers for the CLI
//!
//! Each subcommand gets its own module. Handlers take the validated
//! [`Config`], build a session client from it, and print human-readable
//! output with `colored` and `prettytable`.
//!
//! - `sequence` -- initialize, list tools, call one tool
//! - `tools`    -- list tools or call a single tool
//! - `probe`    -- try every `tools/call` parameter shape
//! - `inspect`  -- send only `initialize` and dump the raw reply

use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::{ProbeError, Result};
use crate::mcp::client::McpSessionClient;

pub mod inspect;
pub mod probe;
pub mod sequence;
pub mod tools;

/// Parse a `--args` value into a tool argument object.
///
/// # Errors
///
/// Returns `ProbeError::InvalidArgument` if the text is not JSON or is not
/// a JSON object.
///
/// # Examples
///
/// ```
/// use mcprobe::commands::parse_tool_args;
///
/// let args = parse_tool_args(r#"{"boardId":"2116448730"}"#).unwrap();
/// assert_eq!(args["boardId"], "2116448730");
/// assert!(parse_tool_args("[1, 2]").is_err());
/// ```
pub fn parse_tool_args(raw: &str) -> Result<Map<String, Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Map::new());
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| ProbeError::InvalidArgument(format!("--args is not valid JSON: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ProbeError::InvalidArgument(format!(
            "--args must be a JSON object, got {}",
            json_kind(&other)
        ))
        .into()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Build a client from `config` and complete the handshake.
pub(crate) async fn connect(config: &Config) -> Result<McpSessionClient> {
    let mut client = config.client_builder().build()?;
    client.initialize_connection().await?;
    Ok(client)
}

/// Serialize a value into a pretty JSON string.
pub(crate) fn to_pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value).map_err(ProbeError::Serialization)?)
}

/// Collect the `text` entries of a tool result's `content` array.
///
/// Returns an empty list when the result does not use the content-block
/// layout.
pub fn content_texts(result: &Value) -> Vec<&str> {
    result
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// Shorten `text` to at most `max` characters for table cells.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
