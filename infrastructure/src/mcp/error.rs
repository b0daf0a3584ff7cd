//! Error types for the MCP transports

use super::protocol::RpcError;
use thiserror::Error;

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// JSON-RPC error codes
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Server-defined: missing or unknown `Mcp-Session-Id`
    pub const SESSION_ERROR: i64 = -32000;
}

/// Protocol-level failures, answered as JSON-RPC error objects
#[derive(Error, Debug, Clone, PartialEq)]
pub enum McpError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal server error")]
    Internal,

    #[error("Bad Request: No valid session ID provided")]
    Session,
}

impl McpError {
    pub fn code(&self) -> i64 {
        match self {
            McpError::Parse(_) => codes::PARSE_ERROR,
            McpError::InvalidRequest(_) => codes::INVALID_REQUEST,
            McpError::MethodNotFound(_) => codes::METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => codes::INVALID_PARAMS,
            McpError::Internal => codes::INTERNAL_ERROR,
            McpError::Session => codes::SESSION_ERROR,
        }
    }

    pub fn to_rpc_error(&self) -> RpcError {
        RpcError {
            code: self.code(),
            message: self.to_string(),
            data: None,
        }
    }
}

impl From<McpError> for RpcError {
    fn from(err: McpError) -> Self {
        err.to_rpc_error()
    }
}

/// Errors that can occur while serving a transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Session {0} is closed")]
    SessionClosed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(McpError::Parse("x".into()).code(), -32700);
        assert_eq!(McpError::InvalidRequest("x".into()).code(), -32600);
        assert_eq!(McpError::MethodNotFound("x".into()).code(), -32601);
        assert_eq!(McpError::InvalidParams("x".into()).code(), -32602);
        assert_eq!(McpError::Internal.code(), -32603);
        assert_eq!(McpError::Session.code(), -32000);
    }

    #[test]
    fn test_session_error_message() {
        let rpc: RpcError = McpError::Session.into();
        assert_eq!(rpc.message, "Bad Request: No valid session ID provided");
        assert_eq!(rpc.code, -32000);
    }
}
