//! Session state owned by a single MCP client
//!
//! A [`Session`] tracks the three things that change over a connection's
//! life: the server-issued session identifier, the next JSON-RPC request id,
//! and whether the handshake has completed. [`SessionHeaders`] holds the
//! candidate header names used to write and read the session identifier,
//! because the target server's exact header contract is not known.

/// Header names sent on every request once a session id is known.
pub const DEFAULT_OUTBOUND_HEADERS: &[&str] = &["X-Session-ID", "Session-ID", "MCP-Session-ID"];

/// Response header names checked for a session id, in priority order.
pub const DEFAULT_INBOUND_HEADERS: &[&str] = &["mcp-session-id", "x-session-id", "session-id"];

/// Candidate header names for session propagation.
///
/// # Examples
///
/// ```
/// use mcprobe::mcp::session::SessionHeaders;
///
/// let headers = SessionHeaders::default();
/// assert_eq!(headers.outbound.len(), 3);
/// assert_eq!(headers.inbound[0], "mcp-session-id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHeaders {
    /// Every name the session id is written under.
    pub outbound: Vec<String>,
    /// Names checked in order on each response; the first present wins.
    pub inbound: Vec<String>,
}

impl SessionHeaders {
    /// Build from explicit lists.
    pub fn new(outbound: Vec<String>, inbound: Vec<String>) -> Self {
        Self { outbound, inbound }
    }

    /// Header pairs to attach for `session_id`.
    pub fn outbound_pairs(&self, session_id: &str) -> Vec<(String, String)> {
        self.outbound
            .iter()
            .map(|name| (name.clone(), session_id.to_string()))
            .collect()
    }
}

impl Default for SessionHeaders {
    fn default() -> Self {
        Self {
            outbound: DEFAULT_OUTBOUND_HEADERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            inbound: DEFAULT_INBOUND_HEADERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Mutable state of one logical connection.
///
/// Not shared: the owning client mutates it through `&mut self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    session_id: Option<String>,
    next_request_id: u64,
    initialized: bool,
}

impl Session {
    /// A fresh session: no id, counter at 1, not initialized.
    pub fn new() -> Self {
        Self {
            session_id: None,
            next_request_id: 1,
            initialized: false,
        }
    }

    /// The adopted session id, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Whether the handshake has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The id the next request will receive.
    pub fn peek_request_id(&self) -> u64 {
        self.next_request_id
    }

    /// Allocate a request id.
    pub fn next_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Record `candidate` as the session id unless one is already set.
    ///
    /// Returns `true` when the candidate was adopted.
    ///
    /// ```
    /// use mcprobe::mcp::session::Session;
    ///
    /// let mut session = Session::new();
    /// assert!(!session.adopt_session_id(""));
    /// assert!(session.adopt_session_id("first"));
    /// assert!(!session.adopt_session_id("second"));
    /// assert_eq!(session.session_id(), Some("first"));
    /// ```
    pub fn adopt_session_id(&mut self, candidate: &str) -> bool {
        if self.session_id.is_some() || candidate.is_empty() {
            return false;
        }
        self.session_id = Some(candidate.to_string());
        true
    }

    /// Mark the handshake complete. There is no way back.
    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new();
        assert!(session.session_id().is_none());
        assert!(!session.is_initialized());
        assert_eq!(session.peek_request_id(), 1);
    }

    #[test]
    fn test_request_ids_increase_from_one() {
        let mut session = Session::new();
        assert_eq!(session.next_request_id(), 1);
        assert_eq!(session.next_request_id(), 2);
        assert_eq!(session.next_request_id(), 3);
        assert_eq!(session.peek_request_id(), 4);
    }

    #[test]
    fn test_first_seen_session_id_wins() {
        let mut session = Session::new();
        assert!(session.adopt_session_id("abc"));
        assert!(!session.adopt_session_id("xyz"));
        assert_eq!(session.session_id(), Some("abc"));
    }

    #[test]
    fn test_mark_initialized_is_sticky() {
        let mut session = Session::new();
        session.mark_initialized();
        session.mark_initialized();
        assert!(session.is_initialized());
    }

    #[test]
    fn test_outbound_pairs_use_every_name() {
        let headers = SessionHeaders::default();
        let pairs = headers.outbound_pairs("sid-1");
        assert_eq!(
            pairs,
            vec![
                ("X-Session-ID".to_string(), "sid-1".to_string()),
                ("Session-ID".to_string(), "sid-1".to_string()),
                ("MCP-Session-ID".to_string(), "sid-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_header_lists() {
        let headers = SessionHeaders::new(vec!["Mcp-Session-Id".into()], vec!["mcp-session-id".into()]);
        assert_eq!(headers.outbound_pairs("s").len(), 1);
        assert_eq!(headers.inbound, vec!["mcp-session-id".to_string()]);
    }
}
