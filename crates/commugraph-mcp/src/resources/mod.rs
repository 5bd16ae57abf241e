//! MCP resource implementations.

pub mod catalog;
pub mod graph;
pub mod registry;
pub mod templates;

pub use registry::ResourceRegistry;

/// URI scheme shared by every resource.
pub const SCHEME: &str = "cgraph://";
