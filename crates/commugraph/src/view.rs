//! Step-bounded views over a [`TemporalGraph`].
//!
//! A view borrows from the base graph: edges point at a prefix of the stored
//! interaction history, so materializing a view copies no interactions and
//! never touches the graph's cached weights.

use crate::graph::TemporalGraph;
use crate::types::{EdgeData, GraphError, GraphResult, Interaction, NodeData};

/// Reject negative steps coming from untyped callers.
pub fn validate_step(step: i64) -> GraphResult<u64> {
    u64::try_from(step).map_err(|_| GraphError::InvalidStep(step))
}

/// An edge as it appears in a view.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'g> {
    edge: &'g EdgeData,
    interactions: &'g [Interaction],
}

impl<'g> EdgeView<'g> {
    pub fn source(&self) -> &'g str {
        self.edge.source()
    }

    pub fn target(&self) -> &'g str {
        self.edge.target()
    }

    /// Interactions kept by the view's bound.
    pub fn interactions(&self) -> &'g [Interaction] {
        self.interactions
    }

    /// View-local weight: the kept interaction count.
    pub fn weight(&self) -> u64 {
        self.interactions.len() as u64
    }

    pub fn is_self_loop(&self) -> bool {
        self.source() == self.target()
    }

    /// Owned copy carrying the view-local weight.
    pub fn to_edge_data(&self) -> EdgeData {
        EdgeData::from_slice(self.source(), self.target(), self.interactions)
    }
}

/// A read-only subgraph of a [`TemporalGraph`] as of some step.
#[derive(Debug, Clone)]
pub struct GraphView<'g> {
    graph: &'g TemporalGraph,
    max_step: Option<u64>,
    nodes: Vec<&'g NodeData>,
    edges: Vec<EdgeView<'g>>,
}

impl<'g> GraphView<'g> {
    pub fn graph(&self) -> &'g TemporalGraph {
        self.graph
    }

    /// The bound this view was materialized with; `None` for the full view.
    pub fn max_step(&self) -> Option<u64> {
        self.max_step
    }

    pub fn nodes(&self) -> &[&'g NodeData] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeView<'g>] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&EdgeView<'g>> {
        self.edges
            .iter()
            .find(|e| e.source() == source && e.target() == target)
    }

    /// Total interactions across the view's edges.
    pub fn interaction_count(&self) -> usize {
        self.edges.iter().map(|e| e.interactions.len()).sum()
    }

    /// Ingested messages covered by the view, broadcasts included.
    pub fn message_count(&self) -> usize {
        match self.max_step {
            Some(step) => self.graph.messages_up_to(step),
            None => self.graph.message_count(),
        }
    }
}

/// Build the view of `graph` bounded by `max_step`.
///
/// With a bound, edges whose kept prefix is empty are dropped and then every
/// node without an incident kept edge is dropped. Without one, every node of
/// the base graph is listed, broadcast-only senders included.
pub(crate) fn materialize(graph: &TemporalGraph, max_step: Option<u64>) -> GraphView<'_> {
    let mut touched = vec![false; graph.nodes.len()];
    let mut edges = Vec::with_capacity(graph.edges.len());

    for (edge, &(source, target)) in graph.edges.iter().zip(&graph.endpoints) {
        let history = edge.interactions();
        let kept = match max_step {
            // Histories are sorted by step, so the kept part is a prefix.
            Some(step) => history.partition_point(|i| i.step_index <= step),
            None => history.len(),
        };
        if kept == 0 {
            continue;
        }
        touched[source] = true;
        touched[target] = true;
        edges.push(EdgeView {
            edge,
            interactions: &history[..kept],
        });
    }

    let nodes = match max_step {
        Some(_) => graph
            .nodes
            .iter()
            .zip(&touched)
            .filter_map(|(node, &keep)| keep.then_some(node))
            .collect(),
        None => graph.nodes.iter().collect(),
    };

    tracing::trace!(
        "Materialized view at {:?}: {} of {} edges",
        max_step,
        edges.len(),
        graph.edges.len()
    );

    GraphView {
        graph,
        max_step,
        nodes,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Message, MessageCategory};
    use chrono::Utc;

    fn graph() -> TemporalGraph {
        let now = Utc::now();
        TemporalGraph::build(vec![
            Message::new(0, now, "A", Some("B"), MessageCategory::Delegation, "d"),
            Message::new(1, now, "B", Some("A"), MessageCategory::Response, "r"),
            Message::new(2, now, "B", Some("A"), MessageCategory::Response, "r"),
            Message::new(3, now, "A", Some("C"), MessageCategory::Delegation, "d"),
            Message::new(4, now, "D", None, MessageCategory::System, "hello all"),
        ])
        .unwrap()
    }

    #[test]
    fn test_validate_step() {
        assert_eq!(validate_step(0), Ok(0));
        assert_eq!(validate_step(17), Ok(17));
        assert_eq!(validate_step(-1), Err(GraphError::InvalidStep(-1)));
    }

    #[test]
    fn test_view_weight_is_local() {
        let g = graph();
        let view = g.filter_at_step(1);
        let ba = view.edge("B", "A").unwrap();
        assert_eq!(ba.weight(), 1);
        assert_eq!(ba.to_edge_data().weight(), 1);
        // Base model untouched.
        assert_eq!(g.edge("B", "A").unwrap().weight(), 2);
    }

    #[test]
    fn test_broadcast_only_node_in_full_view_only() {
        let g = graph();
        assert!(g.node("D").is_some());
        assert!(g.full_view().contains_node("D"));
        assert_eq!(g.full_view().node_count(), 4);
        assert!(!g.filter_at_step(4).contains_node("D"));
        assert_eq!(g.filter_at_step(4).node_count(), 3);
    }

    #[test]
    fn test_step_zero_is_a_real_bound() {
        let g = graph();
        let view = g.view(Some(0));
        assert_eq!(view.max_step(), Some(0));
        assert_eq!(view.edge_count(), 1);
        assert_eq!(view.message_count(), 1);
    }

    #[test]
    fn test_interaction_count() {
        let g = graph();
        assert_eq!(g.full_view().interaction_count(), 4);
        assert_eq!(g.filter_at_step(2).interaction_count(), 3);
    }
}
