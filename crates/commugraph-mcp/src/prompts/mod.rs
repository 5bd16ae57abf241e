//! MCP prompt implementations.

pub mod analyze;
pub mod explain_step;
pub mod registry;

pub use registry::PromptRegistry;
