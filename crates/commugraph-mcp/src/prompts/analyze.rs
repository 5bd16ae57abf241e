//! Prompt `analyze_communication`: Walk through a whole conversation graph.

use serde_json::Value;

use crate::types::{McpResult, PromptGetResult, PromptMessage};

use super::registry::required_arg;

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let graph_id = required_arg(&args, "graph_id")?;
    let focus = args.get("focus").and_then(|v| v.as_str()).unwrap_or("");

    let focus_section = if focus.is_empty() {
        String::new()
    } else {
        format!("\nFocus on: {focus}\n")
    };

    let text = format!(
        "I want to understand how the agents in graph {graph_id} communicate.\n\
         {focus_section}\n\
         Please:\n\
         1. Use graph_info to see the framework, message count and number of steps\n\
         2. Use graph_metrics to find the most central agents and the overall density\n\
         3. Use graph_snapshot without a step to see every edge and its weight\n\
         4. Identify who delegates, who responds, and any agent that only broadcasts or only listens\n\
         5. Summarize the communication structure and point out bottlenecks"
    );

    Ok(PromptGetResult {
        description: Some("Guide for analyzing a multi-agent communication graph".to_string()),
        messages: vec![PromptMessage::user(text)],
    })
}
