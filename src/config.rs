//! Configuration management for mcprobe
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProbeError, Result};
use crate::mcp::client::McpClientBuilder;
use crate::mcp::session::{SessionHeaders, DEFAULT_INBOUND_HEADERS, DEFAULT_OUTBOUND_HEADERS};
use crate::mcp::transport::http::{normalize_base_url, DEFAULT_BASE_URL};
use crate::mcp::types::{METHOD_INITIALIZED, METHOD_NOTIFICATIONS_INITIALIZED};

/// Main configuration structure for mcprobe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where to send requests
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Identity reported in `clientInfo`
    #[serde(default)]
    pub client: ClientIdentityConfig,
    /// Session handshake and header settings
    #[serde(default)]
    pub session: SessionConfig,
}

/// Endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// MCP endpoint; normalized to a single trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Client identity configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientIdentityConfig {
    #[serde(default = "default_client_name")]
    pub name: String,
    #[serde(default = "default_client_version")]
    pub version: String,
}

fn default_client_name() -> String {
    "voice-agent".to_string()
}

fn default_client_version() -> String {
    "1.0.0".to_string()
}

impl Default for ClientIdentityConfig {
    fn default() -> Self {
        Self {
            name: default_client_name(),
            version: default_client_version(),
        }
    }
}

/// Session handshake configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Header names the session id is sent under
    #[serde(default = "default_outbound_headers")]
    pub outbound_headers: Vec<String>,

    /// Response header names checked for a session id, in priority order
    #[serde(default = "default_inbound_headers")]
    pub inbound_headers: Vec<String>,

    /// Method name of the post-initialize notification
    #[serde(default = "default_initialized_method")]
    pub initialized_method: String,

    /// Pause after the handshake before tool calls (milliseconds, 0 disables)
    #[serde(default = "default_post_handshake_delay_ms")]
    pub post_handshake_delay_ms: u64,
}

fn default_outbound_headers() -> Vec<String> {
    DEFAULT_OUTBOUND_HEADERS.iter().map(|s| s.to_string()).collect()
}

fn default_inbound_headers() -> Vec<String> {
    DEFAULT_INBOUND_HEADERS.iter().map(|s| s.to_string()).collect()
}

fn default_initialized_method() -> String {
    METHOD_INITIALIZED.to_string()
}

fn default_post_handshake_delay_ms() -> u64 {
    500
}

impl SessionConfig {
    /// Whether the notification method is one of the names MCP servers use.
    pub fn has_known_initialized_method(&self) -> bool {
        self.initialized_method == METHOD_INITIALIZED
            || self.initialized_method == METHOD_NOTIFICATIONS_INITIALIZED
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            outbound_headers: default_outbound_headers(),
            inbound_headers: default_inbound_headers(),
            initialized_method: default_initialized_method(),
            post_handshake_delay_ms: default_post_handshake_delay_ms(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ProbeError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ProbeError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("MCPROBE_URL") {
            self.endpoint.base_url = url;
        }

        if let Ok(timeout) = std::env::var("MCPROBE_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(v) => self.endpoint.timeout_seconds = v,
                Err(_) => tracing::warn!("Ignoring invalid MCPROBE_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(name) = std::env::var("MCPROBE_CLIENT_NAME") {
            self.client.name = name;
        }

        if let Ok(version) = std::env::var("MCPROBE_CLIENT_VERSION") {
            self.client.version = version;
        }

        if let Ok(delay) = std::env::var("MCPROBE_HANDSHAKE_DELAY_MS") {
            match delay.parse() {
                Ok(v) => self.session.post_handshake_delay_ms = v,
                Err(_) => tracing::warn!("Ignoring invalid MCPROBE_HANDSHAKE_DELAY_MS: {}", delay),
            }
        }

        if let Ok(method) = std::env::var("MCPROBE_INITIALIZED_METHOD") {
            self.session.initialized_method = method;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.url {
            tracing::debug!("Using endpoint override from CLI: {}", url);
            self.endpoint.base_url = url.clone();
        }
        if let Some(delay) = cli.handshake_delay_ms {
            self.session.post_handshake_delay_ms = delay;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        normalize_base_url(&self.endpoint.base_url)
            .map_err(|e| ProbeError::Config(format!("endpoint.base_url: {}", e)))?;

        if self.endpoint.timeout_seconds == 0 {
            return Err(ProbeError::Config(
                "endpoint.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.endpoint.timeout_seconds > 3600 {
            return Err(ProbeError::Config(
                "endpoint.timeout_seconds must be less than or equal to 3600".to_string(),
            )
            .into());
        }

        if self.client.name.trim().is_empty() || self.client.version.trim().is_empty() {
            return Err(ProbeError::Config(
                "client.name and client.version cannot be empty".to_string(),
            )
            .into());
        }

        for (field, names) in [
            ("session.outbound_headers", &self.session.outbound_headers),
            ("session.inbound_headers", &self.session.inbound_headers),
        ] {
            if names.is_empty() {
                return Err(ProbeError::Config(format!("{} cannot be empty", field)).into());
            }
            if names.iter().any(|n| n.trim().is_empty()) {
                return Err(
                    ProbeError::Config(format!("{} cannot contain blank names", field)).into(),
                );
            }
        }

        if self.session.initialized_method.trim().is_empty() {
            return Err(ProbeError::Config(
                "session.initialized_method cannot be empty".to_string(),
            )
            .into());
        }

        if !self.session.has_known_initialized_method() {
            tracing::warn!(
                "session.initialized_method '{}' is neither '{}' nor '{}'",
                self.session.initialized_method,
                METHOD_INITIALIZED,
                METHOD_NOTIFICATIONS_INITIALIZED
            );
        }

        if self.session.post_handshake_delay_ms > 60_000 {
            return Err(ProbeError::Config(
                "session.post_handshake_delay_ms must be less than or equal to 60000".to_string(),
            )
            .into());
        }

        Ok(())
    }

    /// Translate the configuration into a client builder.
    pub fn client_builder(&self) -> McpClientBuilder {
        McpClientBuilder::new()
            .base_url(self.endpoint.base_url.clone())
            .timeout(Duration::from_secs(self.endpoint.timeout_seconds))
            .client_info(self.client.name.clone(), self.client.version.clone())
            .session_headers(SessionHeaders::new(
                self.session.outbound_headers.clone(),
                self.session.inbound_headers.clone(),
            ))
            .initialized_method(self.session.initialized_method.clone())
            .post_handshake_delay(Duration::from_millis(self.session.post_handshake_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: &[&str] = &[
        "MCPROBE_URL",
        "MCPROBE_TIMEOUT_SECONDS",
        "MCPROBE_CLIENT_NAME",
        "MCPROBE_CLIENT_VERSION",
        "MCPROBE_HANDSHAKE_DELAY_MS",
        "MCPROBE_INITIALIZED_METHOD",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint.base_url, "http://localhost:8000/api/mcp/");
        assert_eq!(config.endpoint.timeout_seconds, 30);
        assert_eq!(config.client.name, "voice-agent");
        assert_eq!(config.session.initialized_method, "initialized");
        assert_eq!(config.session.post_handshake_delay_ms, 500);
        assert_eq!(config.session.outbound_headers.len(), 3);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = Config::default();
        config.endpoint.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.endpoint.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_headers() {
        let mut config = Config::default();
        config.session.inbound_headers.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("session.inbound_headers"));
    }

    #[test]
    fn test_config_validation_blank_header_name() {
        let mut config = Config::default();
        config.session.outbound_headers.push(" ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_known_initialized_methods() {
        let mut session = SessionConfig::default();
        assert!(session.has_known_initialized_method());
        session.initialized_method = METHOD_NOTIFICATIONS_INITIALIZED.to_string();
        assert!(session.has_known_initialized_method());

        session.initialized_method = "notifications/ready".to_string();
        assert!(!session.has_known_initialized_method());

        let config = Config {
            session,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_delay_too_large() {
        let mut config = Config::default();
        config.session.post_handshake_delay_ms = 120_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
endpoint:
  base_url: "http://mcp.internal:9000/mcp"
client:
  name: "probe"
session:
  outbound_headers: ["Mcp-Session-Id"]
  initialized_method: "notifications/initialized"
  post_handshake_delay_ms: 0
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.endpoint.base_url, "http://mcp.internal:9000/mcp");
        assert_eq!(config.endpoint.timeout_seconds, 30);
        assert_eq!(config.client.name, "probe");
        assert_eq!(config.client.version, "1.0.0");
        assert_eq!(config.session.outbound_headers, vec!["Mcp-Session-Id"]);
        assert_eq!(config.session.inbound_headers.len(), 3);
        assert_eq!(config.session.post_handshake_delay_ms, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        clear_env();
        let cli = crate::cli::Cli::default();
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_load_reads_file() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "endpoint:\n  timeout_seconds: 5\n").unwrap();

        let cli = crate::cli::Cli::default();
        let config = Config::load(path.to_str().unwrap(), &cli).unwrap();
        assert_eq!(config.endpoint.timeout_seconds, 5);
    }

    #[test]
    #[serial]
    fn test_load_invalid_yaml_is_config_error() {
        clear_env();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "endpoint: [unclosed").unwrap();

        let cli = crate::cli::Cli::default();
        let err = Config::load(path.to_str().unwrap(), &cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    #[serial]
    fn test_apply_env_vars_overrides_fields() {
        clear_env();
        std::env::set_var("MCPROBE_URL", "http://env-host:1234/mcp");
        std::env::set_var("MCPROBE_TIMEOUT_SECONDS", "12");
        std::env::set_var("MCPROBE_CLIENT_NAME", "env-agent");
        std::env::set_var("MCPROBE_HANDSHAKE_DELAY_MS", "not-a-number");
        std::env::set_var("MCPROBE_INITIALIZED_METHOD", "notifications/initialized");

        let mut config = Config::default();
        config.apply_env_vars();
        clear_env();

        assert_eq!(config.endpoint.base_url, "http://env-host:1234/mcp");
        assert_eq!(config.endpoint.timeout_seconds, 12);
        assert_eq!(config.client.name, "env-agent");
        assert_eq!(config.session.post_handshake_delay_ms, 500);
        assert_eq!(config.session.initialized_method, "notifications/initialized");
    }

    #[test]
    #[serial]
    fn test_cli_overrides_win_over_env() {
        clear_env();
        std::env::set_var("MCPROBE_URL", "http://env-host:1234/mcp");
        let cli = crate::cli::Cli {
            url: Some("http://cli-host:4321/mcp".to_string()),
            handshake_delay_ms: Some(0),
            ..crate::cli::Cli::default()
        };
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        clear_env();

        assert_eq!(config.endpoint.base_url, "http://cli-host:4321/mcp");
        assert_eq!(config.session.post_handshake_delay_ms, 0);
    }

    #[test]
    fn test_client_builder_from_config() {
        let mut config = Config::default();
        config.endpoint.base_url = "http://127.0.0.1:1/mcp".to_string();
        let client = config.client_builder().build().unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:1/mcp/");
        assert!(!client.is_initialized());
    }
}
