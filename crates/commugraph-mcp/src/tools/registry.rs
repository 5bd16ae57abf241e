//! Tool registration and dispatch.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::Value;

use crate::config::ServerConfig;
use crate::session::GraphSessionManager;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{
    graph_frameworks, graph_info, graph_metrics, graph_snapshot, graph_upload, session_delete,
    session_list,
};

pub struct ToolRegistry;

impl ToolRegistry {
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            graph_upload::definition(),
            graph_snapshot::definition(),
            graph_metrics::definition(),
            graph_info::definition(),
            graph_frameworks::definition(),
            session_list::definition(),
            session_delete::definition(),
        ]
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        sessions: &Arc<Mutex<GraphSessionManager>>,
        config: &ServerConfig,
    ) -> McpResult<ToolCallResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            "graph_upload" => graph_upload::execute(args, sessions, config).await,
            "graph_snapshot" => graph_snapshot::execute(args, sessions).await,
            "graph_metrics" => graph_metrics::execute(args, sessions).await,
            "graph_info" => graph_info::execute(args, sessions).await,
            "graph_frameworks" => graph_frameworks::execute(args).await,
            "session_list" => session_list::execute(args, sessions).await,
            "session_delete" => session_delete::execute(args, sessions).await,
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}
