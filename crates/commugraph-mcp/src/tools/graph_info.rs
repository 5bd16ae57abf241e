//! Tool `graph_info`: Session metadata without graph data.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::GraphSessionManager;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct InfoParams {
    graph_id: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "graph_info".to_string(),
        description: Some("Framework, counts and timestamps of an uploaded graph".to_string()),
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
    let params: InfoParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let info = sessions.lock().await.info(&params.graph_id)?;
    Ok(ToolCallResult::json(&info))
}
