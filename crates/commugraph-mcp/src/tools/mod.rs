//! MCP tool implementations.

pub mod graph_frameworks;
pub mod graph_info;
pub mod graph_metrics;
pub mod graph_snapshot;
pub mod graph_upload;
pub mod registry;
pub mod session_delete;
pub mod session_list;

pub use registry::ToolRegistry;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{McpError, McpResult};

/// Arguments shared by the tools that read one graph at one step.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQuery {
    pub graph_id: String,
    #[serde(default)]
    pub step: Option<i64>,
}

impl GraphQuery {
    pub fn parse(args: Value) -> McpResult<Self> {
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))
    }

    /// The validated step bound; `None` asks for the full graph.
    pub fn max_step(&self) -> McpResult<Option<u64>> {
        Ok(self.step.map(commugraph::validate_step).transpose()?)
    }
}

pub(crate) fn graph_query_schema(step_description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "graph_id": { "type": "string", "description": "Id returned by graph_upload" },
            "step": { "type": "integer", "minimum": 0, "description": step_description }
        },
        "required": ["graph_id"]
    })
}
