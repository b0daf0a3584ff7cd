//! MCP request dispatcher shared by both transports.
//!
//! [`McpServer`] is stateless: it turns one decoded JSON payload (a single
//! message or a batch) into the JSON to send back, executing tools through
//! the [`ToolExecutorPort`] under the caller's [`CredentialScope`].

use super::error::McpError;
use super::protocol::{
    CallToolParams, CallToolResult, Implementation, IncomingMessage, InitializeParams,
    InitializeResult, JsonRpcResponse, ListToolsResult, RequestId, ServerCapabilities,
    classify_message, negotiate_version,
};
use futures::future::join_all;
use opsgenie_mcp_application::ports::tool_executor::ToolExecutorPort;
use opsgenie_mcp_application::ports::tool_schema::ToolSchemaPort;
use opsgenie_mcp_domain::{CredentialScope, ToolCall};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "opsgenie-mcp-server";

/// Dispatcher for MCP methods
pub struct McpServer {
    executor: Arc<dyn ToolExecutorPort>,
    schema: Arc<dyn ToolSchemaPort>,
    info: Implementation,
}

impl McpServer {
    pub fn new(executor: Arc<dyn ToolExecutorPort>, schema: Arc<dyn ToolSchemaPort>) -> Self {
        Self {
            executor,
            schema,
            info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn info(&self) -> &Implementation {
        &self.info
    }

    /// Parse one raw frame and dispatch it. Unparsable input yields a
    /// `-32700` error response; notification-only input yields `None`.
    pub async fn handle_text(&self, raw: &str, scope: &CredentialScope) -> Option<Value> {
        match serde_json::from_str::<Value>(raw) {
            Ok(payload) => self.handle_payload(payload, scope).await,
            Err(e) => {
                warn!("Discarding malformed JSON-RPC frame: {}", e);
                Some(response_value(JsonRpcResponse::error(
                    None,
                    McpError::Parse(e.to_string()),
                )))
            }
        }
    }

    /// Dispatch a single message or a batch.
    ///
    /// Batches are answered with an array of the non-notification responses,
    /// or nothing when every member was a notification.
    pub async fn handle_payload(&self, payload: Value, scope: &CredentialScope) -> Option<Value> {
        match payload {
            Value::Array(messages) if messages.is_empty() => Some(response_value(
                JsonRpcResponse::error(None, McpError::InvalidRequest("empty batch".to_string())),
            )),
            Value::Array(messages) => {
                debug!(size = messages.len(), "Dispatching JSON-RPC batch");
                let responses: Vec<Value> = join_all(
                    messages
                        .into_iter()
                        .map(|message| self.handle_message(message, scope)),
                )
                .await
                .into_iter()
                .flatten()
                .map(response_value)
                .collect();
                (!responses.is_empty()).then_some(Value::Array(responses))
            }
            message => self.handle_message(message, scope).await.map(response_value),
        }
    }

    /// Dispatch one message; `None` for notifications and client responses
    pub async fn handle_message(
        &self,
        message: Value,
        scope: &CredentialScope,
    ) -> Option<JsonRpcResponse> {
        match classify_message(&message) {
            Ok(IncomingMessage::Request { id, method, params }) => {
                Some(self.handle_request(id, &method, params, scope).await)
            }
            Ok(IncomingMessage::Notification { method, params }) => {
                self.handle_notification(&method, params.as_ref());
                None
            }
            Ok(IncomingMessage::Response) => {
                debug!("Ignoring JSON-RPC response from client");
                None
            }
            Err(response) => {
                warn!("Rejected malformed JSON-RPC message");
                Some(response)
            }
        }
    }

    async fn handle_request(
        &self,
        id: RequestId,
        method: &str,
        params: Option<Value>,
        scope: &CredentialScope,
    ) -> JsonRpcResponse {
        debug!(id = %id, method, "Handling request");
        let result = match method {
            "initialize" => self.initialize(params),
            "ping" => Ok(Value::Object(Default::default())),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(params, scope).await,
            other => Err(McpError::MethodNotFound(other.to_string())),
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                debug!(id = %id, method, "Request failed: {}", e);
                JsonRpcResponse::error(Some(id), e)
            }
        }
    }

    fn handle_notification(&self, method: &str, params: Option<&Value>) {
        match method {
            "notifications/initialized" => info!("Client finished initialization"),
            "notifications/cancelled" => {
                let request_id = params
                    .and_then(|p| p.get("requestId"))
                    .map(Value::to_string)
                    .unwrap_or_default();
                // Tool calls run to completion; there is nothing to abort
                debug!(request_id = %request_id, "Client cancelled a request");
            }
            other => debug!(method = other, "Ignoring notification"),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, McpError> {
        let params: InitializeParams = match params {
            Some(p) => serde_json::from_value(p).map_err(|e| McpError::InvalidParams(e.to_string()))?,
            None => InitializeParams::default(),
        };

        let protocol_version = negotiate_version(&params.protocol_version);
        match &params.client_info {
            Some(client) => info!(
                client = %client.name,
                client_version = %client.version,
                protocol_version,
                "Client initializing"
            ),
            None => info!(protocol_version, "Client initializing"),
        }

        let result = InitializeResult {
            protocol_version: protocol_version.to_string(),
            capabilities: ServerCapabilities::default(),
            server_info: self.info.clone(),
        };
        serde_json::to_value(result).map_err(|_| McpError::Internal)
    }

    fn list_tools(&self) -> Result<Value, McpError> {
        let result = ListToolsResult {
            tools: self.schema.all_tools_schema(self.executor.tool_spec()),
        };
        serde_json::to_value(result).map_err(|_| McpError::Internal)
    }

    async fn call_tool(
        &self,
        params: Option<Value>,
        scope: &CredentialScope,
    ) -> Result<Value, McpError> {
        let params: CallToolParams = params
            .ok_or_else(|| McpError::InvalidParams("missing params".to_string()))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| McpError::InvalidParams(e.to_string()))
            })?;

        if !self.executor.has_tool(&params.name) {
            return Err(McpError::InvalidParams(format!("Tool {} not found", params.name)));
        }

        let arguments = params.arguments.unwrap_or(Value::Object(Default::default()));
        if !arguments.is_object() {
            return Err(McpError::InvalidParams(
                "arguments must be an object".to_string(),
            ));
        }

        let call = ToolCall::from_json(params.name, arguments);
        let result = self.executor.execute(&call, scope).await;
        serde_json::to_value(CallToolResult::from(&result)).map_err(|_| McpError::Internal)
    }
}

fn response_value(response: JsonRpcResponse) -> Value {
    // JsonRpcResponse holds only JSON values and strings
    serde_json::to_value(response).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::JsonSchemaToolConverter;
    use async_trait::async_trait;
    use opsgenie_mcp_domain::{
        RiskLevel, ToolDefinition, ToolError, ToolParameter, ToolResult, ToolSpec,
    };
    use serde_json::json;
    use std::sync::Mutex;

    // -- Helpers ---

    struct MockExecutor {
        spec: ToolSpec,
        seen_keys: Mutex<Vec<Option<String>>>,
    }

    impl MockExecutor {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new().register(
                    ToolDefinition::new("echo", "Echo the message", RiskLevel::Low)
                        .with_parameter(ToolParameter::new("message", "Text", true)),
                ),
                seen_keys: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for MockExecutor {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall, scope: &CredentialScope) -> ToolResult {
            self.seen_keys
                .lock()
                .unwrap()
                .push(scope.resolve(call.get_string("apiKey")).map(|c| c.key.expose().to_string()));
            match call.get_string("message") {
                Some("fail") => ToolResult::failure("echo", ToolError::remote("Opsgenie API Error (500): boom")),
                Some(text) => ToolResult::success("echo", text),
                None => ToolResult::failure("echo", ToolError::invalid_argument("missing message")),
            }
        }
    }

    fn server() -> (McpServer, Arc<MockExecutor>) {
        let executor = Arc::new(MockExecutor::new());
        let server = McpServer::new(executor.clone(), Arc::new(JsonSchemaToolConverter));
        (server, executor)
    }

    async fn request(server: &McpServer, message: Value) -> Value {
        server
            .handle_payload(message, &CredentialScope::default())
            .await
            .unwrap()
    }

    // -- Tests ---

    #[tokio::test]
    async fn test_initialize() {
        let (server, _) = server();
        let response = request(
            &server,
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "0.1"}
            }}),
        )
        .await;

        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "opsgenie-mcp-server");
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_ping() {
        let (server, _) = server();
        let response = request(&server, json!({"jsonrpc": "2.0", "id": "p", "method": "ping"})).await;
        assert_eq!(response, json!({"jsonrpc": "2.0", "result": {}, "id": "p"}));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let (server, _) = server();
        let response = request(&server, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "echo");
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["message"]));
    }

    #[tokio::test]
    async fn test_tools_call_success_and_error_result() {
        let (server, _) = server();
        let response = request(
            &server,
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {"name": "echo", "arguments": {"message": "hi"}}}),
        )
        .await;
        assert_eq!(
            response["result"],
            json!({"content": [{"type": "text", "text": "hi"}], "isError": false})
        );

        let response = request(
            &server,
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call", "params": {"name": "echo", "arguments": {"message": "fail"}}}),
        )
        .await;
        assert_eq!(response["result"]["isError"], true);
        assert_eq!(response["result"]["content"][0]["text"], "Opsgenie API Error (500): boom");
    }

    #[tokio::test]
    async fn test_tools_call_bad_params() {
        let (server, _) = server();
        let unknown = request(
            &server,
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {"name": "nope"}}),
        )
        .await;
        assert_eq!(unknown["error"]["code"], -32602);

        let missing = request(&server, json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call"})).await;
        assert_eq!(missing["error"]["code"], -32602);

        let bad_args = request(
            &server,
            json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call", "params": {"name": "echo", "arguments": [1]}}),
        )
        .await;
        assert_eq!(bad_args["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_tools_call_passes_scope() {
        let (server, executor) = server();
        let scope = CredentialScope::argument(opsgenie_mcp_domain::ApiKey::new("default-key"));
        server
            .handle_payload(
                json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call", "params": {"name": "echo", "arguments": {"message": "x"}}}),
                &scope,
            )
            .await;
        assert_eq!(
            executor.seen_keys.lock().unwrap().clone(),
            vec![Some("default-key".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let (server, _) = server();
        let response = request(&server, json!({"jsonrpc": "2.0", "id": 9, "method": "resources/list"})).await;
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["id"], 9);
    }

    #[tokio::test]
    async fn test_notifications_produce_no_response() {
        let (server, _) = server();
        let scope = CredentialScope::default();
        assert!(
            server
                .handle_payload(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}), &scope)
                .await
                .is_none()
        );
        assert!(
            server
                .handle_payload(
                    json!({"jsonrpc": "2.0", "method": "notifications/cancelled", "params": {"requestId": 3}}),
                    &scope
                )
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_batch() {
        let (server, _) = server();
        let response = request(
            &server,
            json!([
                {"jsonrpc": "2.0", "id": 1, "method": "ping"},
                {"jsonrpc": "2.0", "method": "notifications/initialized"},
                {"jsonrpc": "2.0", "id": 2, "method": "tools/list"}
            ]),
        )
        .await;
        let responses = response.as_array().unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);

        let empty = request(&server, json!([])).await;
        assert_eq!(empty["error"]["code"], -32600);

        let only_notifications = server
            .handle_payload(
                json!([{"jsonrpc": "2.0", "method": "notifications/initialized"}]),
                &CredentialScope::default(),
            )
            .await;
        assert!(only_notifications.is_none());
    }

    #[tokio::test]
    async fn test_malformed_text() {
        let (server, _) = server();
        let response = server
            .handle_text("{not json", &CredentialScope::default())
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], -32700);
        assert_eq!(response["id"], Value::Null);

        let response = server
            .handle_text(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#, &CredentialScope::default())
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], -32600);
    }
}
