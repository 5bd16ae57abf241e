//! Resource: cgraph://sessions and cgraph://frameworks

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::json;

use commugraph::ParserRegistry;

use crate::session::GraphSessionManager;
use crate::types::{McpResult, ReadResourceResult, ResourceContent};

pub async fn read_sessions(
    sessions: &Arc<Mutex<GraphSessionManager>>,
) -> McpResult<ReadResourceResult> {
    let list = sessions.lock().await.list();
    let content = json!({
        "count": list.len(),
        "sessions": list,
    });

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json("cgraph://sessions", &content)],
    })
}

pub fn read_frameworks() -> McpResult<ReadResourceResult> {
    let content = json!({ "frameworks": ParserRegistry::available() });
    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json("cgraph://frameworks", &content)],
    })
}
