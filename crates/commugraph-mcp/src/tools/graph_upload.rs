//! Tool `graph_upload`: Parse a conversation log and build its graph.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

use commugraph::ParseError;

use crate::config::ServerConfig;
use crate::session::{ingest, GraphSessionManager};
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct UploadParams {
    #[serde(default = "default_framework")]
    framework: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    content: Option<String>,
    /// `content` is base64 rather than raw text.
    #[serde(default)]
    base64: bool,
}

fn default_framework() -> String {
    "autogen".to_string()
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "graph_upload".to_string(),
        description: Some(
            "Parse a multi-agent conversation log (JSON array or JSONL) and build its temporal graph"
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "framework": { "type": "string", "default": "autogen", "description": "Log format, see graph_frameworks" },
                "path": { "type": "string", "description": "Log file on the server's filesystem" },
                "content": { "type": "string", "description": "Inline log content" },
                "base64": { "type": "boolean", "default": false, "description": "Inline content is base64 encoded" }
            }
        }),
    }
}

pub async fn execute(
    args: Value,
    sessions: &Arc<Mutex<GraphSessionManager>>,
    config: &ServerConfig,
) -> McpResult<ToolCallResult> {
    let params: UploadParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let bytes = match (&params.path, &params.content) {
        (Some(path), None) => read_log_file(PathBuf::from(path), config.max_upload_bytes).await?,
        (None, Some(content)) => decode_inline(content, params.base64, config.max_upload_bytes)?,
        (Some(_), Some(_)) => {
            return Err(McpError::InvalidParams(
                "Provide either 'path' or 'content', not both".to_string(),
            ))
        }
        (None, None) => {
            return Err(McpError::InvalidParams(
                "Provide a log via 'path' or 'content'".to_string(),
            ))
        }
    };

    let info = ingest(sessions, &params.framework, bytes).await?;

    Ok(ToolCallResult::json(&json!({
        "graph_id": info.graph_id,
        "message_count": info.message_count,
        "node_count": info.node_count,
        "edge_count": info.edge_count,
        "total_steps": info.total_steps,
        "framework": info.framework,
    })))
}

async fn read_log_file(path: PathBuf, max: usize) -> McpResult<Vec<u8>> {
    let meta = tokio::fs::metadata(&path).await.map_err(|e| {
        McpError::InvalidParams(format!("Cannot read {}: {e}", path.display()))
    })?;
    let size = usize::try_from(meta.len()).unwrap_or(usize::MAX);
    if size > max {
        return Err(McpError::ContentTooLarge { size, max });
    }
    if size == 0 {
        return Err(ParseError::EmptyFile(path.display().to_string()).into());
    }
    Ok(tokio::fs::read(&path).await?)
}

fn decode_inline(content: &str, is_base64: bool, max: usize) -> McpResult<Vec<u8>> {
    let bytes = if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(content.trim())
            .map_err(|e| McpError::InvalidParams(format!("Invalid base64 content: {e}")))?
    } else {
        content.as_bytes().to_vec()
    };
    if bytes.len() > max {
        return Err(McpError::ContentTooLarge {
            size: bytes.len(),
            max,
        });
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(McpError::InvalidParams("Log content is empty".to_string()));
    }
    Ok(bytes)
}
