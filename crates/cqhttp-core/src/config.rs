//! Configuration types for the HTTP client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How HTTP sessions are managed across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    /// A fresh HTTP client for every call; nothing is shared between calls.
    #[default]
    PerCall,
    /// One HTTP client shared by every call, so connections are reused.
    Pooled,
}

/// Configuration for the gateway HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Gateway base URL, e.g. `http://127.0.0.1:5700`.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// Session management policy.
    pub session: SessionMode,
}

impl HttpClientConfig {
    /// Creates a new HTTP client config with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            session: SessionMode::default(),
        }
    }

    /// Sets the request timeout duration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the session management policy.
    pub fn with_session(mut self, session: SessionMode) -> Self {
        self.session = session;
        self
    }

    /// Returns the full URL of an endpoint.
    ///
    /// The endpoint is appended verbatim: `{base_url}/{endpoint}`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        endpoint_url(&self.base_url, endpoint)
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5700")
    }
}

/// Joins a base URL and an endpoint name.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{base_url}/{endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_is_verbatim() {
        let config = HttpClientConfig::new("http://host:5700");
        assert_eq!(
            config.endpoint_url("send_group_msg"),
            "http://host:5700/send_group_msg"
        );
        assert_eq!(endpoint_url("http://host/api/", "x"), "http://host/api//x");
    }

    #[test]
    fn test_session_mode_names() {
        let mode: SessionMode = serde_json::from_str(r#""pooled""#).unwrap();
        assert_eq!(mode, SessionMode::Pooled);
        assert_eq!(
            serde_json::to_string(&SessionMode::PerCall).unwrap(),
            r#""per-call""#
        );
    }
}
