//! Two-phase construction: accumulate messages, then fold them into an
//! immutable [`TemporalGraph`].

use std::collections::HashMap;
use std::time::Instant;

use crate::classify::{IntentClassifier, RuleClassifier};
use crate::graph::TemporalGraph;
use crate::types::{
    EdgeData, GraphError, GraphResult, Interaction, InteractionMeta, Message, NodeData,
};

/// Accumulates messages for a single graph build.
///
/// Nothing is folded until [`GraphBuilder::finalize`], which sorts the input
/// by step so the chronological invariants hold even for sloppy callers.
#[derive(Debug)]
pub struct GraphBuilder<C = RuleClassifier> {
    classifier: C,
    messages: Vec<Message>,
}

impl GraphBuilder<RuleClassifier> {
    pub fn new() -> Self {
        Self::with_classifier(RuleClassifier)
    }
}

impl Default for GraphBuilder<RuleClassifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: IntentClassifier> GraphBuilder<C> {
    /// Create a builder that labels interactions with a custom classifier.
    pub fn with_classifier(classifier: C) -> Self {
        Self {
            classifier,
            messages: Vec::new(),
        }
    }

    /// Queue one message.
    pub fn push(&mut self, message: Message) -> &mut Self {
        self.messages.push(message);
        self
    }

    /// Queue a batch of messages, builder-style.
    pub fn ingest_all<I>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = Message>,
    {
        self.messages.extend(messages);
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Fold the queued messages into a graph.
    ///
    /// Fails without producing a partial graph when the input is empty or a
    /// message has no sender.
    pub fn finalize(self) -> GraphResult<TemporalGraph> {
        let Self {
            classifier,
            mut messages,
        } = self;

        if messages.is_empty() {
            return Err(GraphError::EmptyInput);
        }
        if let Some(bad) = messages.iter().find(|m| m.sender.trim().is_empty()) {
            return Err(GraphError::InvalidMessage {
                step: bad.step_index,
                reason: "sender must not be empty".to_string(),
            });
        }

        let started = Instant::now();

        // Stable: ties keep their original relative order.
        messages.sort_by_key(|m| m.step_index);

        let mut fold = Fold::default();
        for message in &messages {
            fold.apply(message, &classifier);
        }

        let steps: Vec<u64> = messages.iter().map(|m| m.step_index).collect();
        let total_steps = steps.last().copied().unwrap_or(0);

        let graph = TemporalGraph {
            nodes: fold.nodes,
            node_index: fold.node_index,
            edges: fold.edges,
            edge_index: fold.edge_index,
            endpoints: fold.endpoints,
            steps,
            total_steps,
        };

        tracing::info!(
            "Built temporal graph: {} messages, {} nodes, {} edges, {} steps in {:?}",
            graph.message_count(),
            graph.node_count(),
            graph.edge_count(),
            total_steps,
            started.elapsed()
        );

        Ok(graph)
    }
}

/// Mutable tables filled while folding sorted messages.
#[derive(Default)]
struct Fold {
    nodes: Vec<NodeData>,
    node_index: HashMap<String, usize>,
    edges: Vec<EdgeData>,
    edge_index: HashMap<(String, String), usize>,
    endpoints: Vec<(usize, usize)>,
}

impl Fold {
    fn apply<C: IntentClassifier>(&mut self, message: &Message, classifier: &C) {
        let sender = self.upsert_node(&message.sender, message);
        {
            let node = &mut self.nodes[sender];
            node.messages_sent += 1;
            node.first_appearance = node.first_appearance.min(message.timestamp);
            node.last_activity = node.last_activity.max(message.timestamp);
        }

        let Some(receiver_id) = message.receiver.as_deref().filter(|r| !r.is_empty()) else {
            return;
        };

        let receiver = self.upsert_node(receiver_id, message);
        self.nodes[receiver].messages_received += 1;

        let interaction = Interaction {
            step_index: message.step_index,
            timestamp: message.timestamp,
            intent: classifier.classify(message.category),
            message_id: message.step_index,
            metadata: InteractionMeta {
                message_type: message.category,
                content_preview: message.content_preview(),
            },
        };

        let edge = self.upsert_edge(sender, receiver);
        self.edges[edge].push(interaction);
    }

    fn upsert_node(&mut self, id: &str, message: &Message) -> usize {
        if let Some(&ix) = self.node_index.get(id) {
            return ix;
        }
        let ix = self.nodes.len();
        self.nodes.push(NodeData::new(id, message.timestamp));
        self.node_index.insert(id.to_string(), ix);
        ix
    }

    fn upsert_edge(&mut self, source: usize, target: usize) -> usize {
        let key = (self.nodes[source].id.clone(), self.nodes[target].id.clone());
        if let Some(&ix) = self.edge_index.get(&key) {
            return ix;
        }
        let ix = self.edges.len();
        self.edges.push(EdgeData::new(&key.0, &key.1));
        self.endpoints.push((source, target));
        self.edge_index.insert(key, ix);
        ix
    }
}
