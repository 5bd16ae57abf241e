//! Main request dispatcher: receives JSON-RPC messages, routes to handlers.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

use crate::config::ServerConfig;
use crate::prompts::PromptRegistry;
use crate::resources::ResourceRegistry;
use crate::session::GraphSessionManager;
use crate::tools::ToolRegistry;
use crate::types::*;

use super::negotiation::NegotiatedCapabilities;
use super::validator::validate_request;

/// Dispatches incoming JSON-RPC messages against one session store.
pub struct ProtocolHandler {
    sessions: Arc<Mutex<GraphSessionManager>>,
    config: ServerConfig,
    capabilities: Arc<Mutex<NegotiatedCapabilities>>,
}

impl ProtocolHandler {
    pub fn new(sessions: Arc<Mutex<GraphSessionManager>>, config: ServerConfig) -> Self {
        Self {
            sessions,
            config,
            capabilities: Arc::new(Mutex::new(NegotiatedCapabilities::default())),
        }
    }

    pub fn sessions(&self) -> &Arc<Mutex<GraphSessionManager>> {
        &self.sessions
    }

    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(notif) => {
                self.handle_notification(notif).await;
                None
            }
            _ => {
                tracing::warn!("Received unexpected message type from client");
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        if let Err(e) = validate_request(&request) {
            return serde_json::to_value(e.to_json_rpc_error(request.id)).unwrap_or_default();
        }

        let id = request.id.clone();
        match self.dispatch_request(&request).await {
            Ok(value) => serde_json::to_value(JsonRpcResponse::new(id, value)).unwrap_or_default(),
            Err(e) => {
                tracing::debug!("{} failed: {e}", request.method);
                serde_json::to_value(e.to_json_rpc_error(id)).unwrap_or_default()
            }
        }
    }

    async fn dispatch_request(&self, request: &JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => {
                let params: InitializeParams = request.params_as()?;
                let result = self.capabilities.lock().await.negotiate(params)?;
                to_value(result)
            }
            "shutdown" => self.handle_shutdown().await,

            "tools/list" => to_value(ToolListResult {
                tools: ToolRegistry::list_tools(),
            }),
            "tools/call" => {
                let params: ToolCallParams = request.params_as()?;
                let result =
                    ToolRegistry::call(&params.name, params.arguments, &self.sessions, &self.config)
                        .await?;
                to_value(result)
            }

            "resources/list" => to_value(ResourceListResult {
                resources: ResourceRegistry::list_resources(),
            }),
            "resources/templates/list" => to_value(ResourceTemplateListResult {
                resource_templates: ResourceRegistry::list_templates(),
            }),
            "resources/read" => {
                let params: ResourceReadParams = request.params_as()?;
                to_value(ResourceRegistry::read(&params.uri, &self.sessions).await?)
            }

            "prompts/list" => to_value(PromptListResult {
                prompts: PromptRegistry::list_prompts(),
            }),
            "prompts/get" => {
                let params: PromptGetParams = request.params_as()?;
                to_value(PromptRegistry::get(&params.name, params.arguments).await?)
            }

            "ping" => Ok(Value::Object(serde_json::Map::new())),

            _ => Err(McpError::MethodNotFound(request.method.clone())),
        }
    }

    async fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "notifications/initialized" | "initialized" => {
                self.capabilities.lock().await.mark_initialized();
            }
            "notifications/cancelled" | "$/cancelRequest" => {
                tracing::info!("Received cancellation notification");
            }
            _ => {
                tracing::debug!("Unknown notification: {}", notification.method);
            }
        }
    }

    async fn handle_shutdown(&self) -> McpResult<Value> {
        let mut sessions = self.sessions.lock().await;
        let expired = sessions.cleanup_expired();
        tracing::info!(
            "Shutdown requested ({} live sessions, {expired} expired)",
            sessions.count()
        );
        Ok(Value::Object(serde_json::Map::new()))
    }
}

fn to_value(result: impl Serialize) -> McpResult<Value> {
    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}
