//! Tool domain module
//!
//! Abstractions for the tools this server exposes to agents. Every tool is
//! defined by a [`ToolDefinition`] (name, typed parameters, risk level),
//! invoked via a [`ToolCall`], and returns a [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (output)     │
//! └──────┬───────┘    └──────┬───────┘    └──────────────┘
//!        │                   │
//!        └── ToolValidator ──┘  required / type / enum / bounds
//! ```
//!
//! # Risk Levels
//!
//! | Risk | Examples | Advertised as |
//! |------|----------|---------------|
//! | **Low** | `opsgenie_list_alerts`, `opsgenie_list_alert_logs` | `readOnlyHint: true` |
//! | **High** | `opsgenie_create_alert`, `opsgenie_close_alert` | `readOnlyHint: false` |
//!
//! # Architecture
//!
//! - **Domain** (this module): Pure definitions and validation, no I/O
//! - **Application** (`ToolExecutorPort`): Port trait for tool execution
//! - **Infrastructure**: JSON Schema conversion and the MCP transports

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator, ValidationError};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
