//! MCP capability negotiation during initialization.

use crate::types::{ClientCapabilities, InitializeParams, InitializeResult, McpResult, MCP_VERSION};

/// Client state recorded during the handshake.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub client: ClientCapabilities,
    pub client_name: Option<String>,
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    /// Accept any protocol version; the server always answers with its own.
    pub fn negotiate(&mut self, params: InitializeParams) -> McpResult<InitializeResult> {
        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                params.protocol_version,
                MCP_VERSION
            );
        }

        tracing::info!(
            "Initialized with client: {} v{}",
            params.client_info.name,
            params.client_info.version
        );
        self.client = params.capabilities;
        self.client_name = Some(params.client_info.name);

        Ok(InitializeResult::default_result())
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
        tracing::info!("MCP handshake complete");
    }
}
