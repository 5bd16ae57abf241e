//! Property-based tests for temporal graph guarantees.
//!
//! For any message list:
//! 1. Building twice yields equal snapshots.
//! 2. Views grow monotonically with the step bound.
//! 3. Every edge weight equals its interaction count.
//! 4. The view at `total_steps` has the full view's edges, and its nodes are
//!    the full view's nodes that have an edge.
//! 5. Density stays within `[0, 1]`.

use proptest::prelude::*;

use chrono::{Duration, TimeZone, Utc};
use commugraph::{Message, MessageCategory, TemporalGraph};

// =============================================================================
// Strategy helpers
// =============================================================================

fn category_strategy() -> impl Strategy<Value = MessageCategory> {
    prop::sample::select(MessageCategory::ALL.to_vec())
}

/// Random conversation among up to five agents, with occasional broadcasts
/// and duplicate step indices.
fn messages_strategy(max_len: usize) -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(
        (
            0u64..40,
            0usize..5,
            prop::option::weighted(0.85, 0usize..5),
            category_strategy(),
            0i64..3_600,
        ),
        1..=max_len,
    )
    .prop_map(|entries| {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        entries
            .into_iter()
            .map(|(step, from, to, category, offset)| {
                let sender = format!("agent-{from}");
                let receiver = to.map(|t| format!("agent-{t}"));
                Message::new(
                    step,
                    base + Duration::seconds(offset),
                    sender,
                    receiver.as_deref(),
                    category,
                    "payload",
                )
            })
            .collect()
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn build_is_idempotent(messages in messages_strategy(30)) {
        let first = TemporalGraph::build(messages.clone()).unwrap();
        let second = TemporalGraph::build(messages).unwrap();
        prop_assert_eq!(first.to_snapshot(None), second.to_snapshot(None));
        prop_assert_eq!(first.metrics(None), second.metrics(None));
    }

    #[test]
    fn views_grow_with_the_bound(messages in messages_strategy(30), k in 0u64..40, extra in 0u64..10) {
        let graph = TemporalGraph::build(messages).unwrap();
        let small = graph.filter_at_step(k);
        let large = graph.filter_at_step(k + extra);

        for node in small.nodes() {
            prop_assert!(large.contains_node(&node.id));
        }
        for edge in small.edges() {
            let wider = large.edge(edge.source(), edge.target());
            prop_assert!(wider.is_some());
            prop_assert!(edge.weight() <= wider.unwrap().weight());
        }
        prop_assert!(small.message_count() <= large.message_count());
    }

    #[test]
    fn weight_matches_history(messages in messages_strategy(30), k in 0u64..40) {
        let graph = TemporalGraph::build(messages).unwrap();
        for edge in graph.edges() {
            prop_assert!(edge.is_consistent());
            prop_assert!(edge
                .interactions()
                .windows(2)
                .all(|w| w[0].step_index <= w[1].step_index));
        }
        for edge in graph.to_snapshot(Some(k)).edges {
            prop_assert!(edge.is_consistent());
            prop_assert!(edge.weight() >= 1);
            prop_assert!(edge.interactions().iter().all(|i| i.step_index <= k));
        }
    }

    #[test]
    fn view_at_total_steps_is_full(messages in messages_strategy(30)) {
        let graph = TemporalGraph::build(messages).unwrap();
        let full = graph.to_snapshot(None);
        let bounded = graph.to_snapshot(Some(graph.total_steps()));
        prop_assert_eq!(&full.edges, &bounded.edges);
        prop_assert_eq!(full.metadata.edge_count, bounded.metadata.edge_count);
        prop_assert_eq!(full.metadata.message_count, bounded.metadata.message_count);

        let linked: Vec<_> = full
            .nodes
            .iter()
            .filter(|n| {
                full.edges
                    .iter()
                    .any(|e| e.source() == n.id || e.target() == n.id)
            })
            .cloned()
            .collect();
        prop_assert_eq!(linked, bounded.nodes);
    }

    #[test]
    fn full_view_lists_every_node(messages in messages_strategy(30)) {
        let graph = TemporalGraph::build(messages).unwrap();
        let full = graph.full_view();
        prop_assert_eq!(full.node_count(), graph.node_count());
        prop_assert_eq!(graph.metrics(None).node_count, graph.node_count());
    }

    #[test]
    fn density_is_bounded(messages in messages_strategy(40), k in prop::option::of(0u64..40)) {
        let graph = TemporalGraph::build(messages).unwrap();
        let metrics = graph.metrics(k);
        prop_assert!(metrics.density >= 0.0);
        prop_assert!(metrics.density <= 1.0);
        if metrics.node_count <= 1 {
            prop_assert!(metrics.degree_centrality.is_none());
        }
    }

    #[test]
    fn counters_match_message_totals(messages in messages_strategy(30)) {
        let total = messages.len() as u64;
        let directed = messages.iter().filter(|m| !m.is_broadcast()).count() as u64;
        let graph = TemporalGraph::build(messages).unwrap();

        let sent: u64 = graph.nodes().iter().map(|n| n.messages_sent).sum();
        let received: u64 = graph.nodes().iter().map(|n| n.messages_received).sum();
        let weights: u64 = graph.edges().iter().map(|e| e.weight()).sum();

        prop_assert_eq!(sent, total);
        prop_assert_eq!(received, directed);
        prop_assert_eq!(weights, directed);
        for node in graph.nodes() {
            prop_assert!(node.first_appearance <= node.last_activity);
        }
    }
}
