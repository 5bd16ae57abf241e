//! HTTP transport: JSON-RPC over `POST /mcp` with optional bearer auth, plus `/health`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::protocol::ProtocolHandler;
use crate::types::{error_codes, JsonRpcMessage, McpError, McpResult};

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub token: Option<String>,
    pub handler: Arc<ProtocolHandler>,
}

/// HTTP transport for web-based MCP clients.
pub struct SseTransport {
    state: Arc<ServerState>,
    cors_origins: Vec<String>,
}

impl SseTransport {
    pub fn new(handler: ProtocolHandler, token: Option<String>) -> Self {
        Self {
            state: Arc::new(ServerState {
                token,
                handler: Arc::new(handler),
            }),
            cors_origins: Vec::new(),
        }
    }

    /// Restrict browser access to these origins; any origin when empty.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    pub fn router(&self) -> Router {
        let state = self.state.clone();

        Router::new()
            .route("/mcp", post(handle_request))
            .layer(middleware::from_fn_with_state(state.clone(), auth_layer))
            .route("/health", get(handle_health))
            .layer(ServiceBuilder::new().layer(cors_layer(&self.cors_origins)))
            .with_state(state)
    }

    /// Run the HTTP server on the given address.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP transport listening on {addr}");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {o:?}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn rpc_failure(status: StatusCode, code: i32, message: &str) -> Response {
    (
        status,
        AxumJson(json!({
            "jsonrpc": "2.0",
            "id": null,
            "error": { "code": code, "message": message }
        })),
    )
        .into_response()
}

/// Checks the bearer token if one is configured. `/health` bypasses this layer.
async fn auth_layer(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: middleware::Next,
) -> Response {
    if let Some(expected) = &state.token {
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .is_some_and(|token| token == expected);

        if !authorized {
            tracing::debug!("Rejected request without a valid bearer token");
            let err = McpError::Unauthorized;
            return rpc_failure(StatusCode::UNAUTHORIZED, err.code(), &err.to_string());
        }
    }

    next.run(request).await
}

async fn handle_request(
    State(state): State<Arc<ServerState>>,
    AxumJson(body): AxumJson<Value>,
) -> Response {
    let msg: JsonRpcMessage = match serde_json::from_value(body) {
        Ok(msg) => msg,
        Err(_) => {
            return rpc_failure(StatusCode::BAD_REQUEST, error_codes::PARSE_ERROR, "Parse error")
        }
    };

    match state.handler.handle_message(msg).await {
        Some(reply) => AxumJson(reply).into_response(),
        // Notifications get no body.
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Health check endpoint; no auth required.
async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<Value> {
    let sessions = state.handler.sessions().lock().await.count();
    AxumJson(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": sessions,
    }))
}
