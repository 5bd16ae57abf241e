//! Tool `session_delete`: Drop an uploaded graph.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::GraphSessionManager;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct DeleteParams {
    graph_id: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "session_delete".to_string(),
        description: Some("Delete an uploaded graph and free its memory".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {
                "graph_id": { "type": "string" }
            },
            "required": ["graph_id"]
        }),
    }
}

pub async fn execute(
    args: Value,
    sessions: &Arc<Mutex<GraphSessionManager>>,
) -> McpResult<ToolCallResult> {
    let params: DeleteParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    if !sessions.lock().await.delete(&params.graph_id) {
        return Err(McpError::SessionNotFound(params.graph_id));
    }

    Ok(ToolCallResult::json(&json!({
        "graph_id": params.graph_id,
        "status": "deleted",
    })))
}
