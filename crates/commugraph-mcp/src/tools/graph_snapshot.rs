//! Tool `graph_snapshot`: The graph as of a step.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use serde_json::Value;

use crate::session::GraphSessionManager;
use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::{graph_query_schema, GraphQuery};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "graph_snapshot".to_string(),
        description: Some(
            "Nodes and edges of an uploaded graph, optionally limited to interactions up to a step"
                .to_string(),
        ),
        input_schema: graph_query_schema(
            "Largest step to include (inclusive); omit for the full graph",
        ),
    }
}

pub async fn execute(
    args: Value,
    sessions: &Arc<Mutex<GraphSessionManager>>,
) -> McpResult<ToolCallResult> {
    let query = GraphQuery::parse(args)?;
    let max_step = query.max_step()?;
    let graph = sessions.lock().await.get(&query.graph_id)?;

    let started = Instant::now();
    let snapshot = graph.to_snapshot(max_step);
    tracing::debug!(
        "Snapshot of {} at {:?}: {} nodes, {} edges in {:?}",
        query.graph_id,
        max_step,
        snapshot.metadata.node_count,
        snapshot.metadata.edge_count,
        started.elapsed()
    );

    Ok(ToolCallResult::json(&snapshot))
}
