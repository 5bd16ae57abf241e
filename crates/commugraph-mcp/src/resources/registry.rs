//! Resource registration and dispatch.

use std::sync::Arc;
use tokio::sync::Mutex;

use commugraph::validate_step;

use crate::session::GraphSessionManager;
use crate::types::{
    McpError, McpResult, ReadResourceResult, ResourceDefinition, ResourceTemplateDefinition,
};

use super::{catalog, graph, templates, SCHEME};

/// A parsed `cgraph://` URI.
#[derive(Debug, PartialEq, Eq)]
enum ResourceUri<'a> {
    Sessions,
    Frameworks,
    Graph { id: &'a str, step: Option<u64> },
    Metrics { id: &'a str },
}

impl<'a> ResourceUri<'a> {
    fn parse(uri: &'a str) -> McpResult<Self> {
        let not_found = || McpError::ResourceNotFound(uri.to_string());
        let path = uri.strip_prefix(SCHEME).ok_or_else(not_found)?;
        let parts: Vec<&str> = path.split('/').collect();

        match parts[..] {
            ["sessions"] => Ok(Self::Sessions),
            ["frameworks"] => Ok(Self::Frameworks),
            ["graph", id] if !id.is_empty() => Ok(Self::Graph { id, step: None }),
            ["graph", id, "step", step] if !id.is_empty() => {
                let raw: i64 = step
                    .parse()
                    .map_err(|_| McpError::InvalidParams(format!("Invalid step: {step}")))?;
                Ok(Self::Graph {
                    id,
                    step: Some(validate_step(raw)?),
                })
            }
            ["metrics", id] if !id.is_empty() => Ok(Self::Metrics { id }),
            _ => Err(not_found()),
        }
    }
}

pub struct ResourceRegistry;

impl ResourceRegistry {
    pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
        templates::list_templates()
    }

    pub fn list_resources() -> Vec<ResourceDefinition> {
        templates::list_resources()
    }

    pub async fn read(
        uri: &str,
        sessions: &Arc<Mutex<GraphSessionManager>>,
    ) -> McpResult<ReadResourceResult> {
        match ResourceUri::parse(uri)? {
            ResourceUri::Sessions => catalog::read_sessions(sessions).await,
            ResourceUri::Frameworks => catalog::read_frameworks(),
            ResourceUri::Graph { id, step } => graph::read_snapshot(id, step, sessions).await,
            ResourceUri::Metrics { id } => graph::read_metrics(id, sessions).await,
        }
    }
}
