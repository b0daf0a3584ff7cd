//! Raw TOML configuration data types
//!
//! This struct represents the exact structure of the TOML config file and
//! of the `OPSGENIE_MCP_*` environment variables merged over it.

use opsgenie_mcp_application::ServerConfig;
use opsgenie_mcp_application::config::{DEFAULT_API_BASE, DEFAULT_PORT};
use opsgenie_mcp_domain::TransportKind;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("port cannot be 0")]
    InvalidPort,

    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("api_base '{url}' is not a valid URL: {reason}")]
    InvalidApiBase { url: String, reason: String },
}

/// Complete file configuration (raw TOML structure)
///
/// ```toml
/// transport = "http"
/// port = 3000
/// api_base = "https://api.eu.opsgenie.com"
/// timeout_seconds = 30
/// api_key = "..."
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// `stdio` or `http`
    pub transport: TransportKind,
    /// Listen port of the HTTP transport
    pub port: u16,
    /// Opsgenie REST endpoint (EU accounts use `https://api.eu.opsgenie.com`)
    pub api_base: String,
    /// Opsgenie request timeout; unset keeps the HTTP client default
    pub timeout_seconds: Option<u64>,
    /// Process default credential
    pub api_key: Option<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            port: DEFAULT_PORT,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_seconds: None,
            api_key: None,
        }
    }
}

impl fmt::Debug for FileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileConfig")
            .field("transport", &self.transport)
            .field("port", &self.port)
            .field("api_base", &self.api_base)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl FileConfig {
    /// Check value constraints the TOML types cannot express
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }
        if self.timeout_seconds == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        Url::parse(&self.api_base).map_err(|e| ConfigValidationError::InvalidApiBase {
            url: self.api_base.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    pub fn into_server_config(self) -> ServerConfig {
        ServerConfig::default()
            .with_transport(self.transport)
            .with_port(self.port)
            .with_api_base(self.api_base)
            .with_timeout_seconds(self.timeout_seconds)
            .with_default_api_key(self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Figment;
    use figment::providers::{Format, Toml};
    use std::time::Duration;

    fn parse(toml: &str) -> FileConfig {
        Figment::new().merge(Toml::string(toml)).extract().unwrap()
    }

    #[test]
    fn test_deserialize_full_config() {
        let config = parse(
            r#"
transport = "http"
port = 8080
api_base = "https://api.eu.opsgenie.com"
timeout_seconds = 15
api_key = "file-key"
"#,
        );
        assert_eq!(config.transport, TransportKind::Http);
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_base, "https://api.eu.opsgenie.com");
        assert_eq!(config.timeout_seconds, Some(15));
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config = parse("port = 4000");
        assert_eq!(config.port, 4000);
        // Defaults should apply
        assert_eq!(config.transport, TransportKind::Stdio);
        assert_eq!(config.api_base, "https://api.opsgenie.com");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_validate() {
        assert!(FileConfig::default().validate().is_ok());

        let config = FileConfig { port: 0, ..FileConfig::default() };
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidPort));

        let config = FileConfig { timeout_seconds: Some(0), ..FileConfig::default() };
        assert_eq!(config.validate(), Err(ConfigValidationError::InvalidTimeout));

        let config = FileConfig { api_base: "not a url".to_string(), ..FileConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidApiBase { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = FileConfig { api_key: Some("secret-key".to_string()), ..FileConfig::default() };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_into_server_config() {
        let config = FileConfig {
            transport: TransportKind::Http,
            port: 9000,
            timeout_seconds: Some(10),
            api_key: Some("k".to_string()),
            ..FileConfig::default()
        }
        .into_server_config();

        assert_eq!(config.transport, TransportKind::Http);
        assert_eq!(config.port, 9000);
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.default_api_key.unwrap().expose(), "k");
    }
}
