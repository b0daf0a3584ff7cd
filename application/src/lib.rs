//! Application layer for opsgenie-mcp
//!
//! This crate contains the alert tool use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ServerConfig;
pub use ports::{
    alert_api::{AlertApiPort, AlertRef, RemoteError},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::alert_tools::{
    AlertToolExecutor,
    definitions::{API_KEY_PARAM, AlertTool, alert_tool_spec},
};
