//! Infrastructure layer for opsgenie-mcp
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Opsgenie REST client, the MCP transports,
//! tool schema conversion and configuration file loading.

pub mod config;
pub mod mcp;
pub mod opsgenie;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoadError, ConfigLoader, ConfigValidationError, FileConfig};
pub use mcp::{HttpState, McpError, McpServer, TransportError, serve_http, serve_stdio};
pub use opsgenie::{ClientError, OpsgenieClient};
pub use tools::JsonSchemaToolConverter;
