//! Response decoding for the session client
//!
//! Two independent steps run on every reply:
//!
//! 1. [`extract_session_id`] checks the candidate session headers in priority
//!    order and returns the first one present.
//! 2. [`decode_response`] picks a framing from the declared content type.
//!    `text/event-stream` bodies are scanned line by line for `data: `
//!    payloads and the first one that parses as a JSON-RPC response wins;
//!    anything else is parsed as a single JSON object.

use crate::error::{McpError, McpResult};
use crate::mcp::transport::InboundResponse;
use crate::mcp::types::JsonRpcResponse;

/// Content type prefix that selects SSE framing.
pub const EVENT_STREAM: &str = "text/event-stream";

/// SSE data line prefix.
const DATA_PREFIX: &str = "data: ";

/// Return the first session id found under `names`, checked in order.
///
/// Stops at the first header present, even when its value is empty.
///
/// # Examples
///
/// ```
/// use mcprobe::mcp::decode::extract_session_id;
/// use mcprobe::mcp::transport::InboundResponse;
///
/// let reply = InboundResponse::new(
///     200,
///     vec![("Session-ID".into(), "b".into()), ("MCP-Session-ID".into(), "a".into())],
///     "",
/// );
/// let names = vec!["mcp-session-id".to_string(), "session-id".to_string()];
/// assert_eq!(extract_session_id(&reply, &names), Some("a".to_string()));
/// ```
pub fn extract_session_id(reply: &InboundResponse, names: &[String]) -> Option<String> {
    names
        .iter()
        .find_map(|name| reply.header(name).map(|value| (name, value)))
        .map(|(name, value)| {
            tracing::debug!(header = %name, "Found session id header");
            value.to_string()
        })
}

/// Decode a reply into a JSON-RPC response using its content type.
///
/// # Errors
///
/// Returns [`McpError::NoValidResponse`] when no JSON-RPC response can be
/// parsed from the body.
pub fn decode_response(reply: &InboundResponse) -> McpResult<JsonRpcResponse> {
    let content_type = reply.content_type();
    let decoded = if content_type.starts_with(EVENT_STREAM) {
        decode_event_stream(&reply.body)
    } else {
        decode_json(&reply.body)
    };

    decoded.map_err(|reason| {
        if reply.is_success() {
            McpError::NoValidResponse(reason)
        } else {
            McpError::NoValidResponse(format!("HTTP {}: {}", reply.status, reason))
        }
    })
}

/// Parse an entire body as one JSON-RPC response.
pub fn decode_json(body: &str) -> std::result::Result<JsonRpcResponse, String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err("empty response body".to_string());
    }
    let response: JsonRpcResponse = serde_json::from_str(trimmed)
        .map_err(|e| format!("body is not a JSON-RPC response: {}", e))?;
    if response.is_response() {
        Ok(response)
    } else {
        Err("body carries neither result nor error".to_string())
    }
}

/// Return the first `data: ` line of an SSE body that parses as a JSON-RPC
/// response. Lines that fail to parse, and server requests or notifications
/// carrying neither `result` nor `error`, are skipped.
///
/// # Examples
///
/// ```
/// use mcprobe::mcp::decode::decode_event_stream;
///
/// let body = "event: message\ndata: not json\ndata: {\"jsonrpc\":\"2.0\",\"id\":3,\"result\":{\"ok\":true}}\n";
/// let resp = decode_event_stream(body).unwrap();
/// assert_eq!(resp.result.unwrap()["ok"], true);
/// ```
pub fn decode_event_stream(body: &str) -> std::result::Result<JsonRpcResponse, String> {
    let mut data_lines = 0usize;
    for line in body.lines() {
        let line = line.trim_end_matches('\r');
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            continue;
        };
        data_lines += 1;
        match serde_json::from_str::<JsonRpcResponse>(payload) {
            Ok(response) if response.is_response() => return Ok(response),
            Ok(_) => tracing::debug!("Skipping SSE data line without result or error"),
            Err(e) => tracing::debug!(error = %e, "Skipping unparseable SSE data line"),
        }
    }

    if data_lines == 0 {
        Err("event stream contained no data lines".to_string())
    } else {
        Err(format!(
            "none of {} event stream data lines was a JSON-RPC response",
            data_lines
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(content_type: &str, body: &str) -> InboundResponse {
        InboundResponse::new(
            200,
            vec![("Content-Type".into(), content_type.into())],
            body,
        )
    }

    fn inbound_names() -> Vec<String> {
        crate::mcp::session::SessionHeaders::default().inbound
    }

    #[test]
    fn test_plain_json_body_decoded() {
        let resp = decode_response(&reply(
            "application/json",
            r#"{"jsonrpc":"2.0","id":2,"result":{"boards":[]}}"#,
        ))
        .unwrap();
        assert_eq!(resp.result, Some(json!({"boards": []})));
        assert_eq!(resp.id, Some(json!(2)));
    }

    #[test]
    fn test_sse_single_data_line_decoded() {
        let resp = decode_response(&reply(
            "text/event-stream",
            "data: {\"jsonrpc\":\"2.0\",\"id\":3,\"result\":{\"ok\":true}}\n",
        ))
        .unwrap();
        assert_eq!(resp.result, Some(json!({"ok": true})));
    }

    #[test]
    fn test_sse_content_type_with_charset() {
        let resp = decode_response(&reply(
            "text/event-stream; charset=utf-8",
            "data: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{}}\r\n\r\n",
        ))
        .unwrap();
        assert_eq!(resp.result, Some(json!({})));
    }

    #[test]
    fn test_sse_skips_bad_lines_and_returns_first_good() {
        let body = concat!(
            "event: message\n",
            "data: {broken\n",
            "\n",
            "data: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":\"first\"}\n",
            "data: {\"jsonrpc\":\"2.0\",\"id\":2,\"result\":\"second\"}\n",
        );
        let resp = decode_response(&reply("text/event-stream", body)).unwrap();
        assert_eq!(resp.result, Some(json!("first")));
    }

    #[test]
    fn test_sse_without_valid_lines_is_no_valid_response() {
        let err = decode_response(&reply("text/event-stream", "data: nope\n")).unwrap_err();
        assert!(matches!(err, McpError::NoValidResponse(_)));

        let err = decode_response(&reply("text/event-stream", ": comment only\n")).unwrap_err();
        assert!(err.to_string().contains("no data lines"));
    }

    #[test]
    fn test_sse_skips_notification_before_response() {
        let body = concat!(
            "event: message\n",
            "data: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/progress\",\"params\":{\"progress\":1}}\n",
            "\n",
            "event: message\n",
            "data: {\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"boards\":[1]}}\n",
        );
        let resp = decode_response(&reply("text/event-stream", body)).unwrap();
        assert_eq!(resp.id, Some(json!(2)));
        assert_eq!(resp.into_result().unwrap(), json!({"boards": [1]}));
    }

    #[test]
    fn test_sse_with_only_notifications_is_no_valid_response() {
        let body = "data: {\"jsonrpc\":\"2.0\",\"method\":\"notifications/message\"}\n";
        let err = decode_response(&reply("text/event-stream", body)).unwrap_err();
        assert!(matches!(err, McpError::NoValidResponse(_)));
    }

    #[test]
    fn test_json_without_result_or_error_is_no_valid_response() {
        let err = decode_response(&reply("application/json", r#"{"jsonrpc":"2.0","id":2}"#))
            .unwrap_err();
        assert!(matches!(err, McpError::NoValidResponse(_)));
        assert!(err.to_string().contains("neither result nor error"));
    }

    #[test]
    fn test_json_null_result_is_accepted() {
        let resp = decode_response(&reply(
            "application/json",
            r#"{"jsonrpc":"2.0","id":2,"result":null}"#,
        ))
        .unwrap();
        assert_eq!(resp.result, Some(serde_json::Value::Null));
    }

    #[test]
    fn test_data_prefix_requires_space() {
        let err = decode_event_stream("data:{\"jsonrpc\":\"2.0\",\"result\":1}\n").unwrap_err();
        assert!(err.contains("no data lines"));
    }

    #[test]
    fn test_empty_json_body_is_no_valid_response() {
        let err = decode_response(&reply("application/json", "")).unwrap_err();
        assert!(matches!(err, McpError::NoValidResponse(_)));
    }

    #[test]
    fn test_missing_content_type_uses_json() {
        let r = InboundResponse::new(200, vec![], r#"{"jsonrpc":"2.0","id":1,"result":5}"#);
        assert_eq!(decode_response(&r).unwrap().result, Some(json!(5)));
    }

    #[test]
    fn test_error_status_reported_in_message() {
        let r = InboundResponse::new(500, vec![], "Internal Server Error");
        let err = decode_response(&r).unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_error_status_with_rpc_body_still_decodes() {
        let r = InboundResponse::new(
            400,
            vec![("content-type".into(), "application/json".into())],
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32600,"message":"Bad Request"}}"#,
        );
        let resp = decode_response(&r).unwrap();
        assert_eq!(resp.error.unwrap().code, -32600);
    }

    #[test]
    fn test_session_header_priority() {
        let r = InboundResponse::new(
            200,
            vec![
                ("session-id".into(), "low".into()),
                ("x-session-id".into(), "mid".into()),
                ("mcp-session-id".into(), "high".into()),
            ],
            "",
        );
        assert_eq!(extract_session_id(&r, &inbound_names()), Some("high".into()));
    }

    #[test]
    fn test_session_header_case_insensitive() {
        let r = InboundResponse::new(200, vec![("X-Session-ID".into(), "abc".into())], "");
        assert_eq!(extract_session_id(&r, &inbound_names()), Some("abc".into()));
    }

    #[test]
    fn test_no_session_header() {
        let r = InboundResponse::new(200, vec![], "");
        assert_eq!(extract_session_id(&r, &inbound_names()), None);
    }
}
