//! Tool `session_list`: All live graph sessions.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::{json, Value};

use crate::session::GraphSessionManager;
use crate::types::{McpResult, ToolCallResult, ToolDefinition};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "session_list".to_string(),
        description: Some("List uploaded graphs that have not expired".to_string()),
        input_schema: json!({ "type": "object", "properties": {} }),
    }
}

pub async fn execute(
    _args: Value,
    sessions: &Arc<Mutex<GraphSessionManager>>,
) -> McpResult<ToolCallResult> {
    let sessions = sessions.lock().await.list();
    Ok(ToolCallResult::json(&json!({
        "count": sessions.len(),
        "sessions": sessions,
    })))
}
