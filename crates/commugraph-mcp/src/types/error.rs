//! Error types and JSON-RPC error codes for the MCP server.

use commugraph::{GraphError, ParseError};

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId, JSONRPC_VERSION};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP-specific error codes.
pub mod mcp_error_codes {
    pub const CONTENT_TOO_LARGE: i32 = -32801;
    pub const RESOURCE_NOT_FOUND: i32 = -32802;
    pub const TOOL_NOT_FOUND: i32 = -32803;
    pub const PROMPT_NOT_FOUND: i32 = -32804;
    pub const SESSION_NOT_FOUND: i32 = -32851;
    pub const GRAPH_ERROR: i32 = -32852;
    /// The session exists but its graph is still being built.
    pub const GRAPH_NOT_READY: i32 = -32853;
    pub const LOG_PARSE_ERROR: i32 = -32854;

    /// Server: Unauthorized (missing or invalid bearer token).
    pub const UNAUTHORIZED: i32 = -32900;
}

/// All errors that can occur in the MCP server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Content too large: {size} bytes exceeds {max} bytes")]
    ContentTooLarge { size: usize, max: usize },

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    #[error("Graph not found: {0}. It may have expired or been deleted.")]
    SessionNotFound(String),

    #[error("Graph error: {0}")]
    Graph(GraphError),

    #[error("Log parse error: {0}")]
    LogParse(ParseError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unauthorized: missing or invalid bearer token.
    #[error("Unauthorized")]
    Unauthorized,
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::InternalError(_) => INTERNAL_ERROR,
            McpError::ContentTooLarge { .. } => CONTENT_TOO_LARGE,
            McpError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            McpError::ToolNotFound(_) => TOOL_NOT_FOUND,
            McpError::PromptNotFound(_) => PROMPT_NOT_FOUND,
            McpError::SessionNotFound(_) => SESSION_NOT_FOUND,
            McpError::Graph(GraphError::NotBuilt(_)) => GRAPH_NOT_READY,
            McpError::Graph(GraphError::InvalidStep(_)) => INVALID_PARAMS,
            McpError::Graph(_) => GRAPH_ERROR,
            McpError::LogParse(ParseError::UnsupportedFramework { .. }) => INVALID_PARAMS,
            McpError::LogParse(ParseError::Io(_)) => INTERNAL_ERROR,
            McpError::LogParse(_) => LOG_PARSE_ERROR,
            McpError::Transport(_) | McpError::Io(_) => INTERNAL_ERROR,
            McpError::Json(_) => PARSE_ERROR,
            McpError::Unauthorized => UNAUTHORIZED,
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code: self.code(),
                message: self.to_string(),
                data: None,
            },
        }
    }
}

impl From<GraphError> for McpError {
    fn from(e: GraphError) -> Self {
        McpError::Graph(e)
    }
}

impl From<ParseError> for McpError {
    fn from(e: ParseError) -> Self {
        McpError::LogParse(e)
    }
}

pub type McpResult<T> = Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_codes() {
        assert_eq!(
            McpError::from(GraphError::NotBuilt("abc".into())).code(),
            mcp_error_codes::GRAPH_NOT_READY
        );
        assert_eq!(
            McpError::from(GraphError::InvalidStep(-3)).code(),
            error_codes::INVALID_PARAMS
        );
        assert_eq!(
            McpError::from(GraphError::EmptyInput).code(),
            mcp_error_codes::GRAPH_ERROR
        );
    }

    #[test]
    fn test_parse_error_codes() {
        let unsupported = ParseError::UnsupportedFramework {
            name: "crewai".into(),
            available: "autogen".into(),
        };
        assert_eq!(McpError::from(unsupported).code(), error_codes::INVALID_PARAMS);
        assert_eq!(
            McpError::from(ParseError::NoMessages).code(),
            mcp_error_codes::LOG_PARSE_ERROR
        );
    }

    #[test]
    fn test_json_rpc_error_carries_message() {
        let err = McpError::SessionNotFound("deadbeef".into());
        let rpc = err.to_json_rpc_error(RequestId::Number(7));
        assert_eq!(rpc.error.code, mcp_error_codes::SESSION_NOT_FOUND);
        assert!(rpc.error.message.contains("deadbeef"));
    }
}
