//! CommuGraph MCP Server: step-by-step access to multi-agent communication graphs.

pub mod config;
pub mod prompts;
pub mod protocol;
pub mod repl;
pub mod resources;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::ServerConfig;
pub use protocol::ProtocolHandler;
pub use session::GraphSessionManager;
pub use transport::StdioTransport;
