//! Resource: cgraph://graph/{id}, cgraph://graph/{id}/step/{step}, cgraph://metrics/{id}

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::session::GraphSessionManager;
use crate::types::{McpResult, ReadResourceResult, ResourceContent};

pub async fn read_snapshot(
    graph_id: &str,
    max_step: Option<u64>,
    sessions: &Arc<Mutex<GraphSessionManager>>,
) -> McpResult<ReadResourceResult> {
    let graph = sessions.lock().await.get(graph_id)?;
    let uri = match max_step {
        Some(step) => format!("cgraph://graph/{graph_id}/step/{step}"),
        None => format!("cgraph://graph/{graph_id}"),
    };

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json(uri, &graph.to_snapshot(max_step))],
    })
}

pub async fn read_metrics(
    graph_id: &str,
    sessions: &Arc<Mutex<GraphSessionManager>>,
) -> McpResult<ReadResourceResult> {
    let graph = sessions.lock().await.get(graph_id)?;

    Ok(ReadResourceResult {
        contents: vec![ResourceContent::json(
            format!("cgraph://metrics/{graph_id}"),
            &graph.metrics(None),
        )],
    })
}
