//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod alert_api;
pub mod tool_executor;
pub mod tool_schema;
