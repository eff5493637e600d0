use std::fs;
use std::path::PathBuf;

use mcprobe::config::Config;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::{MockServer, ResponseTemplate};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Config pointed at `server` with the handshake delay disabled.
#[allow(dead_code)]
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.endpoint.base_url = format!("{}/api/mcp", server.uri());
    config.endpoint.timeout_seconds = 5;
    config.session.post_handshake_delay_ms = 0;
    config
}

#[allow(dead_code)]
pub fn initialize_result() -> Value {
    json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {"tools": {}},
        "serverInfo": {"name": "monday-mcp", "version": "0.3.0"}
    })
}

/// JSON reply for request `id`.
#[allow(dead_code)]
pub fn json_reply(id: u64, result: Value) -> ResponseTemplate {
    let body = json!({"jsonrpc": "2.0", "id": id, "result": result});
    ResponseTemplate::new(200).set_body_raw(body.to_string().into_bytes(), "application/json")
}

/// SSE reply carrying one `message` event for request `id`.
#[allow(dead_code)]
pub fn sse_reply(id: u64, result: Value) -> ResponseTemplate {
    let payload = json!({"jsonrpc": "2.0", "id": id, "result": result});
    let body = format!("event: message\ndata: {}\n\n", payload);
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/event-stream")
}
