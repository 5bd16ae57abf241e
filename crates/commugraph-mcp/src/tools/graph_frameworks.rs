//! Tool `graph_frameworks`: Supported log formats.

use serde_json::{json, Value};

use commugraph::ParserRegistry;

use crate::types::{McpResult, ToolCallResult, ToolDefinition};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "graph_frameworks".to_string(),
        description: Some("List the log frameworks graph_upload can parse".to_string()),
        input_schema: json!({ "type": "object", "properties": {} }),
    }
}

pub async fn execute(_args: Value) -> McpResult<ToolCallResult> {
    Ok(ToolCallResult::json(&json!({
        "frameworks": ParserRegistry::available(),
    })))
}
