//! Prompt registration and dispatch.

use serde_json::Value;

use crate::types::{McpError, McpResult, PromptArgument, PromptDefinition, PromptGetResult};

use super::{analyze, explain_step};

pub struct PromptRegistry;

impl PromptRegistry {
    pub fn list_prompts() -> Vec<PromptDefinition> {
        vec![
            PromptDefinition {
                name: "analyze_communication".to_string(),
                description: Some(
                    "Guide for analyzing who talks to whom across a whole conversation".to_string(),
                ),
                arguments: Some(vec![
                    PromptArgument::new("graph_id", "Graph to analyze", true),
                    PromptArgument::new(
                        "focus",
                        "Optional agent or question to focus on",
                        false,
                    ),
                ]),
            },
            PromptDefinition {
                name: "explain_step".to_string(),
                description: Some(
                    "Guide for explaining what changed in the graph at one step".to_string(),
                ),
                arguments: Some(vec![
                    PromptArgument::new("graph_id", "Graph to inspect", true),
                    PromptArgument::new("step", "Step to explain", true),
                ]),
            },
        ]
    }

    pub async fn get(name: &str, arguments: Option<Value>) -> McpResult<PromptGetResult> {
        let args = arguments.unwrap_or(Value::Object(serde_json::Map::new()));

        match name {
            "analyze_communication" => analyze::expand(args),
            "explain_step" => explain_step::expand(args),
            _ => Err(McpError::PromptNotFound(name.to_string())),
        }
    }
}

/// A required string argument.
pub(super) fn required_arg(args: &Value, name: &str) -> McpResult<String> {
    match args.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(McpError::InvalidParams(format!("Missing argument: {name}"))),
    }
}
