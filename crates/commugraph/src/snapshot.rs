//! Wire shape of a graph view.

use serde::{Deserialize, Serialize};

use crate::types::{EdgeData, NodeData};
use crate::view::GraphView;

/// Counts describing the view a snapshot was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub node_count: usize,
    pub edge_count: usize,
    pub message_count: usize,
}

/// Complete, owned graph state at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeData>,
    pub edges: Vec<EdgeData>,
    /// The step bound, or `null` for the full graph.
    pub current_step: Option<u64>,
    pub total_steps: u64,
    pub metadata: SnapshotMeta,
}

impl GraphView<'_> {
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let nodes: Vec<NodeData> = self.nodes().iter().map(|&n| n.clone()).collect();
        let edges: Vec<EdgeData> = self.edges().iter().map(|e| e.to_edge_data()).collect();

        GraphSnapshot {
            metadata: SnapshotMeta {
                node_count: nodes.len(),
                edge_count: edges.len(),
                message_count: self.message_count(),
            },
            nodes,
            edges,
            current_step: self.max_step(),
            total_steps: self.graph().total_steps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::TemporalGraph;
    use crate::types::{Message, MessageCategory};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_snapshot_wire_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let graph = TemporalGraph::build(vec![Message::new(
            0,
            ts,
            "Manager",
            Some("Coder"),
            MessageCategory::Delegation,
            "Please implement the user authentication feature",
        )])
        .unwrap();

        let value = serde_json::to_value(graph.to_snapshot(None)).unwrap();
        assert_eq!(
            value,
            json!({
                "nodes": [
                    {
                        "id": "Manager",
                        "label": "Manager",
                        "messages_sent": 1,
                        "messages_received": 0,
                        "first_appearance": "2024-01-15T10:00:00Z",
                        "last_activity": "2024-01-15T10:00:00Z",
                        "metadata": {}
                    },
                    {
                        "id": "Coder",
                        "label": "Coder",
                        "messages_sent": 0,
                        "messages_received": 1,
                        "first_appearance": "2024-01-15T10:00:00Z",
                        "last_activity": "2024-01-15T10:00:00Z",
                        "metadata": {}
                    }
                ],
                "edges": [
                    {
                        "source": "Manager",
                        "target": "Coder",
                        "interactions": [
                            {
                                "step_index": 0,
                                "timestamp": "2024-01-15T10:00:00Z",
                                "intent": "delegation",
                                "message_id": 0,
                                "metadata": {
                                    "message_type": "delegation",
                                    "content_preview": "Please implement the user authentication feature"
                                }
                            }
                        ],
                        "weight": 1
                    }
                ],
                "current_step": null,
                "total_steps": 0,
                "metadata": { "node_count": 2, "edge_count": 1, "message_count": 1 }
            })
        );
    }

    #[test]
    fn test_filtered_snapshot_counts_reflect_view() {
        let ts = Utc::now();
        let graph = TemporalGraph::build(vec![
            Message::new(0, ts, "A", Some("B"), MessageCategory::Delegation, "x"),
            Message::new(1, ts, "B", Some("C"), MessageCategory::Delegation, "y"),
            Message::new(2, ts, "C", Some("A"), MessageCategory::Response, "z"),
        ])
        .unwrap();

        let snap = graph.to_snapshot(Some(0));
        assert_eq!(snap.current_step, Some(0));
        assert_eq!(snap.total_steps, 2);
        assert_eq!(snap.metadata.node_count, 2);
        assert_eq!(snap.metadata.edge_count, 1);
        assert_eq!(snap.metadata.message_count, 1);
        assert!(snap.edges.iter().all(|e| e.is_consistent()));
    }

    #[test]
    fn test_snapshot_deserializes() {
        let ts = Utc::now();
        let graph = TemporalGraph::build(vec![Message::new(
            3,
            ts,
            "A",
            Some("B"),
            MessageCategory::Feedback,
            "looks good",
        )])
        .unwrap();
        let text = serde_json::to_string(&graph.to_snapshot(Some(3))).unwrap();
        let back: super::GraphSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back.edges[0].weight(), 1);
        assert_eq!(back.current_step, Some(3));
    }
}
