//! JSON-RPC protocol types for MCP communication.
//!
//! This module defines the message structures of the Model Context Protocol,
//! carried as JSON-RPC 2.0 over either transport.
//!
//! # Protocol Overview
//!
//! - **Requests**: Client → server (`initialize`, `ping`, `tools/list`, `tools/call`)
//! - **Responses**: Server → client (result or error)
//! - **Notifications**: Client → server (`notifications/initialized`, `notifications/cancelled`)

use super::error::McpError;
use opsgenie_mcp_domain::ToolResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// Newest protocol revision this server speaks
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";

/// Revisions accepted during version negotiation
pub const SUPPORTED_PROTOCOL_VERSIONS: [&str; 3] = ["2025-06-18", "2025-03-26", "2024-11-05"];

/// Pick the revision to answer `initialize` with: the client's if we speak
/// it, our newest otherwise.
pub fn negotiate_version(requested: &str) -> &'static str {
    SUPPORTED_PROTOCOL_VERSIONS
        .into_iter()
        .find(|v| *v == requested)
        .unwrap_or(LATEST_PROTOCOL_VERSION)
}

/// JSON-RPC request id (string or number)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl RequestId {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RequestId::Number),
            Value::String(s) => Some(RequestId::String(s.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "{}", s),
        }
    }
}

/// JSON-RPC response (outgoing)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    /// `null` when the request id could not be determined
    pub id: Option<RequestId>,
}

impl JsonRpcResponse {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result: Some(result),
            error: None,
            id: Some(id),
        }
    }

    pub fn error(id: Option<RequestId>, error: impl Into<RpcError>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result: None,
            error: Some(error.into()),
            id,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Classification of an incoming JSON-RPC message.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    /// Has `id` + `method`; must be answered.
    Request {
        id: RequestId,
        method: String,
        params: Option<Value>,
    },
    /// Has `method`, no `id`; never answered.
    Notification {
        method: String,
        params: Option<Value>,
    },
    /// A response to a server-initiated request. This server sends none, so
    /// these are dropped.
    Response,
}

impl IncomingMessage {
    pub fn method(&self) -> Option<&str> {
        match self {
            IncomingMessage::Request { method, .. } | IncomingMessage::Notification { method, .. } => {
                Some(method)
            }
            IncomingMessage::Response => None,
        }
    }

    pub fn is_initialize(&self) -> bool {
        matches!(self, IncomingMessage::Request { method, .. } if method == "initialize")
    }
}

/// Classify a JSON-RPC message by inspecting `jsonrpc`, `id` and `method`.
///
/// Malformed messages yield the error response to send back; its id is the
/// message's id when one could be read.
pub fn classify_message(value: &Value) -> std::result::Result<IncomingMessage, JsonRpcResponse> {
    let Some(object) = value.as_object() else {
        return Err(JsonRpcResponse::error(
            None,
            McpError::InvalidRequest("message must be a JSON object".to_string()),
        ));
    };

    let raw_id = object.get("id").filter(|v| !v.is_null());
    let id = raw_id.and_then(RequestId::from_value);
    let invalid = |reason: &str| {
        Err(JsonRpcResponse::error(
            id.clone(),
            McpError::InvalidRequest(reason.to_string()),
        ))
    };

    if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return invalid("jsonrpc must be \"2.0\"");
    }
    if raw_id.is_some() && id.is_none() {
        return invalid("id must be a string or an integer");
    }

    let params = object.get("params").cloned();
    match (id.clone(), object.get("method")) {
        (Some(id), Some(Value::String(method))) => Ok(IncomingMessage::Request {
            id,
            method: method.clone(),
            params,
        }),
        (None, Some(Value::String(method))) => Ok(IncomingMessage::Notification {
            method: method.clone(),
            params,
        }),
        (_, Some(_)) => invalid("method must be a string"),
        (_, None) if object.contains_key("result") || object.contains_key("error") => {
            Ok(IncomingMessage::Response)
        }
        (_, None) => invalid("missing method"),
    }
}

/// Whether a POST body opens a new session: a single `initialize` request
pub fn is_initialize_request(value: &Value) -> bool {
    classify_message(value).is_ok_and(|m| m.is_initialize())
}

// ==================== Method payloads ====================

/// Name and version of a protocol participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// `initialize` request params
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializeParams {
    pub protocol_version: String,
    pub capabilities: Value,
    pub client_info: Option<Implementation>,
}

/// `initialize` result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

/// `tools/list` result
#[derive(Debug, Clone, Serialize)]
pub struct ListToolsResult {
    pub tools: Vec<Value>,
}

/// `tools/call` request params
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// A block of tool output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// `tools/call` result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<Content>,
    pub is_error: bool,
}

impl CallToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            is_error: true,
        }
    }
}

impl From<&ToolResult> for CallToolResult {
    fn from(result: &ToolResult) -> Self {
        if result.is_success() {
            Self::text(result.text())
        } else {
            Self::error(result.text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsgenie_mcp_domain::ToolError;
    use serde_json::json;

    #[test]
    fn classify_request() {
        let msg = classify_message(&json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})).unwrap();
        assert_eq!(
            msg,
            IncomingMessage::Request {
                id: RequestId::Number(1),
                method: "tools/list".to_string(),
                params: None
            }
        );
    }

    #[test]
    fn classify_string_id_request() {
        let msg = classify_message(&json!({"jsonrpc": "2.0", "id": "abc", "method": "ping"})).unwrap();
        assert!(matches!(msg, IncomingMessage::Request { id: RequestId::String(ref s), .. } if s == "abc"));
    }

    #[test]
    fn classify_notification() {
        let msg = classify_message(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"})).unwrap();
        assert_eq!(msg.method(), Some("notifications/initialized"));
        assert!(matches!(msg, IncomingMessage::Notification { .. }));
    }

    #[test]
    fn classify_client_response() {
        let msg = classify_message(&json!({"jsonrpc": "2.0", "id": 7, "result": {}})).unwrap();
        assert_eq!(msg, IncomingMessage::Response);
    }

    #[test]
    fn classify_rejects_wrong_version_keeping_id() {
        let err = classify_message(&json!({"jsonrpc": "1.0", "id": 3, "method": "ping"})).unwrap_err();
        assert_eq!(err.id, Some(RequestId::Number(3)));
        assert_eq!(err.error.unwrap().code, -32600);
    }

    #[test]
    fn classify_rejects_non_object_and_bad_id() {
        assert!(classify_message(&json!("ping")).is_err());
        let err = classify_message(&json!({"jsonrpc": "2.0", "id": {"x": 1}, "method": "ping"})).unwrap_err();
        assert!(err.id.is_none());
    }

    #[test]
    fn initialize_detection() {
        assert!(is_initialize_request(
            &json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}})
        ));
        assert!(!is_initialize_request(&json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})));
        assert!(!is_initialize_request(&json!({"jsonrpc": "2.0", "method": "initialize"})));
        assert!(!is_initialize_request(&json!([{"jsonrpc": "2.0", "id": 1, "method": "initialize"}])));
    }

    #[test]
    fn version_negotiation() {
        assert_eq!(negotiate_version("2024-11-05"), "2024-11-05");
        assert_eq!(negotiate_version("1999-01-01"), LATEST_PROTOCOL_VERSION);
    }

    #[test]
    fn response_serialization() {
        let ok = JsonRpcResponse::success(RequestId::Number(1), json!({}));
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"jsonrpc": "2.0", "result": {}, "id": 1}));

        let err = JsonRpcResponse::error(None, McpError::Internal);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"jsonrpc": "2.0", "error": {"code": -32603, "message": "Internal server error"}, "id": null})
        );
    }

    #[test]
    fn call_tool_result_from_tool_result() {
        let ok = ToolResult::success("t", "done");
        assert_eq!(
            serde_json::to_value(CallToolResult::from(&ok)).unwrap(),
            json!({"content": [{"type": "text", "text": "done"}], "isError": false})
        );

        let failed = ToolResult::failure("t", ToolError::remote("Opsgenie API Error (404): not found"));
        let result = CallToolResult::from(&failed);
        assert!(result.is_error);
        assert_eq!(
            result.content,
            vec![Content::Text {
                text: "Opsgenie API Error (404): not found".to_string()
            }]
        );
    }
}
