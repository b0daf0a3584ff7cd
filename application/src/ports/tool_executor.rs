//! Tool Executor port
//!
//! Defines the interface for executing the tools exposed to agents.

use async_trait::async_trait;
use opsgenie_mcp_domain::{CredentialScope, ToolCall, ToolDefinition, ToolResult, ToolSpec};

/// Port for tool execution
///
/// This port defines how the transports execute tools. Execution never
/// fails at the type level: validation and remote errors come back as a
/// failed [`ToolResult`].
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get(name).is_some()
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Execute a tool call under the given credential policy
    async fn execute(&self, call: &ToolCall, scope: &CredentialScope) -> ToolResult;
}
