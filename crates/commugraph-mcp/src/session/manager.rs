//! In-memory graph sessions: lifecycle, expiry, and background builds.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use commugraph::{GraphError, ParserRegistry, TemporalGraph};

use crate::config::ServerConfig;
use crate::types::{McpError, McpResult};

const SESSION_ID_LEN: usize = 8;

/// Whether a session's graph can be queried yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Ready,
}

enum Slot {
    Pending,
    Ready(Arc<TemporalGraph>),
}

struct SessionEntry {
    slot: Slot,
    framework: String,
    created_at: DateTime<Utc>,
    last_accessed: DateTime<Utc>,
}

/// Public description of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub graph_id: String,
    pub framework: String,
    pub status: SessionStatus,
    pub message_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub total_steps: u64,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

/// Owns every uploaded graph, keyed by a short opaque id.
///
/// Graphs are handed out as `Arc` clones, so deleting or expiring a session
/// never invalidates a query that already holds its graph.
pub struct GraphSessionManager {
    sessions: HashMap<String, SessionEntry>,
    expiry: Duration,
}

impl GraphSessionManager {
    pub fn new(expiry: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            expiry,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.session_expiry())
    }

    /// Store a finished graph and return its new id.
    pub fn create(&mut self, graph: TemporalGraph, framework: &str) -> String {
        let id = self.insert(Slot::Ready(Arc::new(graph)), framework);
        tracing::info!("Created session {id} ({framework})");
        id
    }

    /// Claim an id for a graph that is still being built.
    pub fn reserve(&mut self, framework: &str) -> String {
        let id = self.insert(Slot::Pending, framework);
        tracing::debug!("Reserved session {id} ({framework})");
        id
    }

    /// Fill a reserved slot.
    pub fn complete(&mut self, id: &str, graph: TemporalGraph) -> McpResult<()> {
        let entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| McpError::SessionNotFound(id.to_string()))?;
        entry.slot = Slot::Ready(Arc::new(graph));
        entry.last_accessed = Utc::now();
        tracing::info!("Session {id} ready");
        Ok(())
    }

    /// Drop a reserved slot whose build failed.
    pub fn abandon(&mut self, id: &str) {
        if self.sessions.remove(id).is_some() {
            tracing::debug!("Abandoned session {id}");
        }
    }

    /// The graph for `id`, refreshing its access time.
    pub fn get(&mut self, id: &str) -> McpResult<Arc<TemporalGraph>> {
        let entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| McpError::SessionNotFound(id.to_string()))?;
        entry.last_accessed = Utc::now();
        match &entry.slot {
            Slot::Ready(graph) => Ok(Arc::clone(graph)),
            Slot::Pending => Err(GraphError::NotBuilt(id.to_string()).into()),
        }
    }

    pub fn info(&mut self, id: &str) -> McpResult<SessionInfo> {
        let entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| McpError::SessionNotFound(id.to_string()))?;
        entry.last_accessed = Utc::now();
        Ok(describe(id, entry))
    }

    /// Returns whether the session existed.
    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            tracing::info!("Deleted session {id}");
        }
        removed
    }

    /// All sessions, oldest first.
    pub fn list(&self) -> Vec<SessionInfo> {
        let mut infos: Vec<SessionInfo> = self
            .sessions
            .iter()
            .map(|(id, entry)| describe(id, entry))
            .collect();
        infos.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.graph_id.cmp(&b.graph_id))
        });
        infos
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Evict sessions idle past the expiry window. Returns how many went.
    ///
    /// Slots still being built are never evicted.
    pub fn cleanup_expired(&mut self) -> usize {
        self.cleanup_expired_at(Utc::now())
    }

    pub fn cleanup_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.expiry;
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| {
            matches!(entry.slot, Slot::Pending) || entry.last_accessed >= cutoff
        });
        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::info!("Expired {removed} idle session(s)");
        }
        removed
    }

    fn insert(&mut self, slot: Slot, framework: &str) -> String {
        let id = loop {
            let candidate: String = uuid::Uuid::new_v4()
                .simple()
                .to_string()
                .chars()
                .take(SESSION_ID_LEN)
                .collect();
            if !self.sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        let now = Utc::now();
        self.sessions.insert(
            id.clone(),
            SessionEntry {
                slot,
                framework: framework.to_string(),
                created_at: now,
                last_accessed: now,
            },
        );
        id
    }

    #[cfg(test)]
    fn backdate(&mut self, id: &str, by: Duration) {
        if let Some(entry) = self.sessions.get_mut(id) {
            entry.last_accessed = entry.last_accessed - by;
        }
    }
}

fn describe(id: &str, entry: &SessionEntry) -> SessionInfo {
    let (status, message_count, node_count, edge_count, total_steps) = match &entry.slot {
        Slot::Pending => (SessionStatus::Pending, 0, 0, 0, 0),
        Slot::Ready(graph) => (
            SessionStatus::Ready,
            graph.message_count(),
            graph.node_count(),
            graph.edge_count(),
            graph.total_steps(),
        ),
    };
    SessionInfo {
        graph_id: id.to_string(),
        framework: entry.framework.clone(),
        status,
        message_count,
        node_count,
        edge_count,
        total_steps,
        created_at: entry.created_at,
        last_accessed: entry.last_accessed,
    }
}

/// Parse and build a log off the async runtime, publishing it as a new session.
///
/// The session is visible as pending while the build runs; a failed build
/// leaves no session behind.
pub async fn ingest(
    manager: &Arc<Mutex<GraphSessionManager>>,
    framework: &str,
    bytes: Vec<u8>,
) -> McpResult<SessionInfo> {
    // Fail fast on unknown frameworks before claiming an id.
    let parser = ParserRegistry::get(framework)?;
    let framework = parser.framework();

    let id = manager.lock().await.reserve(framework);
    let started = Instant::now();

    let built = tokio::task::spawn_blocking(move || -> McpResult<TemporalGraph> {
        let messages = parser.parse(&bytes)?;
        Ok(TemporalGraph::build(messages)?)
    })
    .await
    .map_err(|e| McpError::InternalError(format!("Graph build task failed: {e}")));

    let mut sessions = manager.lock().await;
    match built.and_then(|r| r) {
        Ok(graph) => {
            sessions.complete(&id, graph)?;
            tracing::debug!("Ingested session {id} in {:?}", started.elapsed());
            sessions.info(&id)
        }
        Err(e) => {
            tracing::warn!("Upload for session {id} failed: {e}");
            sessions.abandon(&id);
            Err(e)
        }
    }
}

/// Periodically evict idle sessions for as long as the runtime lives.
pub fn spawn_cleanup_task(
    manager: Arc<Mutex<GraphSessionManager>>,
    period: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            manager.lock().await.cleanup_expired();
        }
    })
}
