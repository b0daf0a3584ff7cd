//! Application-level configuration.
//!
//! Runtime settings the composition root hands to the use cases and
//! transports once every configuration layer has been merged.

use opsgenie_mcp_domain::{ApiKey, CredentialScope, TransportKind};
use std::time::Duration;

/// Default Opsgenie REST endpoint
pub const DEFAULT_API_BASE: &str = "https://api.opsgenie.com";

/// Default port of the HTTP transport
pub const DEFAULT_PORT: u16 = 3000;

/// Server behavior configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Which transport to serve
    pub transport: TransportKind,
    /// Listen port of the HTTP transport
    pub port: u16,
    /// Base URL of the Opsgenie REST API
    pub api_base: String,
    /// Maximum time to wait for an Opsgenie response. `None` leaves the
    /// HTTP client default in place.
    pub timeout: Option<Duration>,
    /// Process-wide fallback credential
    pub default_api_key: Option<ApiKey>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            port: DEFAULT_PORT,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: None,
            default_api_key: None,
        }
    }
}

impl ServerConfig {
    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the Opsgenie timeout from an optional number of seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn with_timeout_seconds(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.map(Duration::from_secs);
        self
    }

    /// Set the process default credential. Blank keys are ignored.
    pub fn with_default_api_key(mut self, key: Option<String>) -> Self {
        self.default_api_key = key.and_then(ApiKey::new);
        self
    }

    /// Credential policy for a stdio session: the tool argument first, then
    /// the process default.
    pub fn stdio_credential_scope(&self) -> CredentialScope {
        CredentialScope::argument(self.default_api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.transport, TransportKind::Stdio);
        assert_eq!(config.port, 3000);
        assert_eq!(config.api_base, "https://api.opsgenie.com");
        assert!(config.timeout.is_none());
        assert!(config.default_api_key.is_none());
    }

    #[test]
    fn test_builders() {
        let config = ServerConfig::default()
            .with_transport(TransportKind::Http)
            .with_port(8080)
            .with_timeout_seconds(Some(30))
            .with_default_api_key(Some("  ".to_string()));

        assert_eq!(config.transport, TransportKind::Http);
        assert_eq!(config.port, 8080);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        // Blank key is treated as absent
        assert!(config.default_api_key.is_none());
        assert!(!config.stdio_credential_scope().supplies_credential());
    }

    #[test]
    fn test_stdio_scope_uses_default_key() {
        let config = ServerConfig::default().with_default_api_key(Some("key-1".to_string()));
        let scope = config.stdio_credential_scope();
        let resolved = scope.resolve(None).unwrap();
        assert_eq!(resolved.key.expose(), "key-1");
    }
}
