//! Tool `graph_metrics`: Density and centrality of a graph view.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::{json, Value};

use crate::session::GraphSessionManager;
use crate::types::{McpResult, ToolCallResult, ToolDefinition};

use super::{graph_query_schema, GraphQuery};

const TOP_CENTRAL: usize = 5;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "graph_metrics".to_string(),
        description: Some(
            "Node/edge counts, density and degree centrality, optionally as of a step".to_string(),
        ),
        input_schema: graph_query_schema(
            "Compute metrics over the view up to this step; omit for the full graph",
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

    let metrics = graph.metrics(max_step);
    let most_central: Vec<Value> = metrics
        .top_central(TOP_CENTRAL)
        .into_iter()
        .map(|(agent, score)| json!({ "agent": agent, "degree_centrality": score }))
        .collect();

    let mut result = serde_json::to_value(&metrics)?;
    result["step"] = json!(max_step);
    result["most_central"] = Value::Array(most_central);

    Ok(ToolCallResult::json(&result))
}
