//! Realtime transport configuration.

use std::time::Duration;

use crate::reconnect::ReconnectConfig;

/// Fixed endpoint path for the notification channel.
pub const NOTIFICATIONS_PATH: &str = "/ws/notifications";

/// Default time to wait for the server to accept the auth handshake.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the realtime client.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Full WebSocket endpoint URL.
    pub endpoint: String,
    /// Maximum time to wait for `auth_success` after the socket opens.
    pub auth_timeout: Duration,
    /// Reconnection behavior.
    pub reconnect: ReconnectConfig,
}

impl RealtimeConfig {
    /// Create a configuration for the given endpoint URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            reconnect: ReconnectConfig::default(),
        }
    }

    /// Create a configuration for a host, choosing `wss://` when the page
    /// itself is served securely.
    #[must_use]
    pub fn for_host(host: &str, secure: bool) -> Self {
        Self::new(endpoint_url(host, secure))
    }

    /// Set the auth handshake timeout.
    #[must_use]
    pub const fn with_auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }

    /// Set reconnection configuration.
    #[must_use]
    pub fn with_reconnect_config(mut self, config: ReconnectConfig) -> Self {
        self.reconnect = config;
        self
    }
}

/// Build the notification endpoint URL for a host.
#[must_use]
pub fn endpoint_url(host: &str, secure: bool) -> String {
    let scheme = if secure { "wss" } else { "ws" };
    format!("{scheme}://{host}{NOTIFICATIONS_PATH}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_scheme_follows_page_security() {
        assert_eq!(
            endpoint_url("care.example.com", true),
            "wss://care.example.com/ws/notifications"
        );
        assert_eq!(
            endpoint_url("localhost:8080", false),
            "ws://localhost:8080/ws/notifications"
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = RealtimeConfig::for_host("care.example.com", true);
        assert_eq!(config.endpoint, "wss://care.example.com/ws/notifications");
        assert_eq!(config.auth_timeout, DEFAULT_AUTH_TIMEOUT);
        assert_eq!(config.reconnect.max_attempts, Some(5));
    }

    #[test]
    fn test_config_builders() {
        let config = RealtimeConfig::new("ws://127.0.0.1:9000/ws/notifications")
            .with_auth_timeout(Duration::from_secs(2))
            .with_reconnect_config(ReconnectConfig {
                max_attempts: Some(1),
                ..Default::default()
            });

        assert_eq!(config.auth_timeout, Duration::from_secs(2));
        assert_eq!(config.reconnect.max_attempts, Some(1));
    }
}
