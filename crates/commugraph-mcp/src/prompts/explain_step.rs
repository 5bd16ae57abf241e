//! Prompt `explain_step`: What happened at one point of the conversation.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptGetResult, PromptMessage};

use super::registry::required_arg;

pub fn expand(args: Value) -> McpResult<PromptGetResult> {
    let graph_id = required_arg(&args, "graph_id")?;
    let step: u64 = required_arg(&args, "step")?
        .parse()
        .map_err(|_| McpError::InvalidParams("step must be a non-negative integer".to_string()))?;

    let previous = match step.checked_sub(1) {
        Some(prev) => format!("graph_snapshot with step {prev}"),
        None => "nothing (this is the first step)".to_string(),
    };

    let text = format!(
        "Explain what happened at step {step} of graph {graph_id}.\n\n\
         Please:\n\
         1. Use graph_snapshot with step {step} to see the graph at that point\n\
         2. Compare it with {previous}\n\
         3. Name the interaction(s) that appeared, their sender, receiver and intent\n\
         4. Use graph_metrics with step {step} to see whether centrality shifted"
    );

    Ok(PromptGetResult {
        description: Some(format!("Explain step {step} of graph {graph_id}")),
        messages: vec![PromptMessage::user(text)],
    })
}
