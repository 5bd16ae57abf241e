//! The immutable temporal graph produced by [`GraphBuilder`].

use std::collections::HashMap;

use crate::builder::GraphBuilder;
use crate::metrics::{compute_metrics, GraphMetrics};
use crate::snapshot::GraphSnapshot;
use crate::types::{EdgeData, GraphResult, Message, NodeData};
use crate::view::{materialize, GraphView};

/// A directed communication graph whose edges carry step-tagged interaction
/// histories.
///
/// There is no mutating API: once built, a graph can be shared behind an
/// `Arc` and queried from any number of threads.
#[derive(Debug, Clone)]
pub struct TemporalGraph {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) node_index: HashMap<String, usize>,
    pub(crate) edges: Vec<EdgeData>,
    pub(crate) edge_index: HashMap<(String, String), usize>,
    /// `(source, target)` node positions, parallel to `edges`.
    pub(crate) endpoints: Vec<(usize, usize)>,
    /// Step index of every ingested message, sorted.
    pub(crate) steps: Vec<u64>,
    pub(crate) total_steps: u64,
}

impl TemporalGraph {
    /// Build a graph from a complete message list.
    pub fn build(messages: impl IntoIterator<Item = Message>) -> GraphResult<Self> {
        GraphBuilder::new().ingest_all(messages).finalize()
    }

    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.node_index.get(id).map(|&ix| &self.nodes[ix])
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&EdgeData> {
        self.edge_index
            .get(&(source.to_string(), target.to_string()))
            .map(|&ix| &self.edges[ix])
    }

    /// All nodes in order of first appearance.
    pub fn nodes(&self) -> &[NodeData] {
        &self.nodes
    }

    /// All edges in order of first interaction.
    pub fn edges(&self) -> &[EdgeData] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Highest step index among the ingested messages.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Number of ingested messages, broadcasts included.
    pub fn message_count(&self) -> usize {
        self.steps.len()
    }

    /// Number of ingested messages with `step_index <= max_step`.
    pub fn messages_up_to(&self, max_step: u64) -> usize {
        self.steps.partition_point(|&s| s <= max_step)
    }

    /// The view as of `max_step`, inclusive.
    pub fn filter_at_step(&self, max_step: u64) -> GraphView<'_> {
        materialize(self, Some(max_step))
    }

    /// The unbounded view: all nodes, and every edge with its full history.
    pub fn full_view(&self) -> GraphView<'_> {
        materialize(self, None)
    }

    /// `filter_at_step` when a bound is given, `full_view` otherwise.
    pub fn view(&self, max_step: Option<u64>) -> GraphView<'_> {
        materialize(self, max_step)
    }

    /// Serializable snapshot of the view selected by `max_step`.
    pub fn to_snapshot(&self, max_step: Option<u64>) -> GraphSnapshot {
        self.view(max_step).to_snapshot()
    }

    /// Density and centrality of the view selected by `max_step`.
    pub fn metrics(&self, max_step: Option<u64>) -> GraphMetrics {
        compute_metrics(&self.view(max_step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageCategory;
    use chrono::Utc;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_graph_is_shareable() {
        assert_send_sync::<TemporalGraph>();
    }

    #[test]
    fn test_messages_up_to_counts_broadcasts() {
        let now = Utc::now();
        let graph = TemporalGraph::build(vec![
            Message::new(0, now, "A", Some("B"), MessageCategory::Delegation, "go"),
            Message::new(1, now, "A", None, MessageCategory::System, "all hands"),
            Message::new(4, now, "B", Some("A"), MessageCategory::Response, "done"),
        ])
        .unwrap();

        assert_eq!(graph.message_count(), 3);
        assert_eq!(graph.messages_up_to(0), 1);
        assert_eq!(graph.messages_up_to(1), 2);
        assert_eq!(graph.messages_up_to(3), 2);
        assert_eq!(graph.messages_up_to(100), 3);
    }

    #[test]
    fn test_lookup_by_id() {
        let now = Utc::now();
        let graph = TemporalGraph::build(vec![Message::new(
            0,
            now,
            "Manager",
            Some("Coder"),
            MessageCategory::Delegation,
            "implement auth",
        )])
        .unwrap();

        assert!(graph.node("Manager").is_some());
        assert!(graph.node("Tester").is_none());
        assert!(graph.edge("Manager", "Coder").is_some());
        assert!(graph.edge("Coder", "Manager").is_none());
    }
}
