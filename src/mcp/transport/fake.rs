//! In-process fake transport for MCP unit tests
//!
//! [`FakeTransport`] records every outbound request and answers from a
//! queue of scripted replies. When the queue is empty it answers with a
//! transport error, which keeps a forgotten script from hanging a test.
//!
//! ```text
//! client post() --> sent (test inspects) ; replies (test scripts) --> client
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{McpError, McpResult};
use crate::mcp::transport::{InboundResponse, OutboundRequest, Transport};

/// Scripted transport. Cloning shares the same script and log.
#[derive(Debug, Clone, Default)]
pub struct FakeTransport {
    replies: Arc<Mutex<VecDeque<McpResult<InboundResponse>>>>,
    sent: Arc<Mutex<Vec<OutboundRequest>>>,
}

impl FakeTransport {
    /// An empty fake with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw reply.
    pub fn push_reply(&self, reply: McpResult<InboundResponse>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Queue a `200 application/json` reply carrying `body`.
    pub fn push_json(&self, body: serde_json::Value) {
        self.push_reply(Ok(InboundResponse::new(
            200,
            vec![("Content-Type".into(), "application/json".into())],
            body.to_string(),
        )));
    }

    /// Queue a `200 application/json` reply that also sets `header: value`.
    pub fn push_json_with_header(&self, body: serde_json::Value, header: &str, value: &str) {
        self.push_reply(Ok(InboundResponse::new(
            200,
            vec![
                ("Content-Type".into(), "application/json".into()),
                (header.to_string(), value.to_string()),
            ],
            body.to_string(),
        )));
    }

    /// Queue an empty `202 Accepted` reply.
    pub fn push_accepted(&self) {
        self.push_reply(Ok(InboundResponse::new(202, Vec::new(), "")));
    }

    /// Queue a transport failure.
    pub fn push_transport_error(&self, message: &str) {
        self.push_reply(Err(McpError::Transport(message.to_string())));
    }

    /// Every request posted so far.
    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Parsed bodies of every request posted so far.
    pub fn sent_bodies(&self) -> Vec<serde_json::Value> {
        self.sent()
            .iter()
            .map(|r| serde_json::from_str(&r.body).expect("client sent invalid JSON"))
            .collect()
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn post(&self, request: OutboundRequest) -> McpResult<InboundResponse> {
        self.sent.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(McpError::Transport("no scripted reply".to_string())))
    }

    fn endpoint(&self) -> &str {
        "fake://mcp/"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_and_replays_in_order() {
        let fake = FakeTransport::new();
        fake.push_json(json!({"first": true}));
        fake.push_accepted();

        let req = OutboundRequest {
            headers: vec![],
            body: "{}".into(),
        };
        let first = fake.post(req.clone()).await.unwrap();
        let second = fake.post(req).await.unwrap();

        assert_eq!(first.content_type(), "application/json");
        assert_eq!(second.status, 202);
        assert_eq!(fake.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_script_is_transport_error() {
        let fake = FakeTransport::new();
        let err = fake
            .post(OutboundRequest {
                headers: vec![],
                body: "{}".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
