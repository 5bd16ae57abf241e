//! Session management for uploaded graphs.

pub mod manager;

pub use manager::{ingest, spawn_cleanup_task, GraphSessionManager, SessionInfo, SessionStatus};
