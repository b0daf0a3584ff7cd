//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain) from "how they are advertised"
//! (infrastructure). The domain layer defines [`ToolDefinition`] and
//! [`ToolSpec`]; this port handles the JSON Schema conversion that the
//! `tools/list` response requires.

use opsgenie_mcp_domain::{ToolDefinition, ToolSpec};

/// Port for converting tool definitions to MCP tool descriptors (JSON Schema).
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to an MCP tool descriptor.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools, in registration order.
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        spec.all().map(|t| self.tool_to_schema(t)).collect()
    }
}
