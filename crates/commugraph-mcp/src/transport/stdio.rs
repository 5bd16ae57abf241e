//! Stdio transport: reads JSON-RPC from stdin, writes to stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::McpResult;

use super::framing;

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Serve stdin/stdout until EOF.
    pub async fn run(&self) -> McpResult<()> {
        tracing::info!("Stdio transport started");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve newline-delimited JSON-RPC over any reader/writer pair.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                tracing::info!("EOF on input, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let reply = match framing::parse_message(trimmed) {
                Ok(msg) => self.handler.handle_message(msg).await,
                Err(e) => {
                    tracing::warn!("Parse error: {e}");
                    Some(framing::parse_failure(&e)?)
                }
            };

            if let Some(reply) = reply {
                let framed = framing::frame_message(&reply)?;
                writer.write_all(framed.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }
}
