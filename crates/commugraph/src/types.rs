//! Core data types for messages, interactions, and graph elements.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock time attached to messages and interactions.
pub type Timestamp = DateTime<Utc>;

/// Number of characters kept in an interaction's content preview.
pub const CONTENT_PREVIEW_CHARS: usize = 100;

/// Upper bound on entries in a [`Metadata`] side map.
pub const MAX_METADATA_ENTRIES: usize = 32;

/// Classification of a message as emitted by a log parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageCategory {
    Thought,
    Action,
    Observation,
    Delegation,
    Response,
    System,
    Feedback,
}

impl MessageCategory {
    pub const ALL: [MessageCategory; 7] = [
        MessageCategory::Thought,
        MessageCategory::Action,
        MessageCategory::Observation,
        MessageCategory::Delegation,
        MessageCategory::Response,
        MessageCategory::System,
        MessageCategory::Feedback,
    ];

    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageCategory::Thought => "thought",
            MessageCategory::Action => "action",
            MessageCategory::Observation => "observation",
            MessageCategory::Delegation => "delegation",
            MessageCategory::Response => "response",
            MessageCategory::System => "system",
            MessageCategory::Feedback => "feedback",
        }
    }

    /// Look up a category by its wire name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse semantic label attached to an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Delegation,
    InformationRequest,
    InformationResponse,
    Feedback,
    Coordination,
    #[default]
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Delegation => "delegation",
            Intent::InformationRequest => "information_request",
            Intent::InformationResponse => "information_response",
            Intent::Feedback => "feedback",
            Intent::Coordination => "coordination",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar value in a metadata side map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::Text(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::Text(s)
    }
}

impl From<i64> for MetaValue {
    fn from(n: i64) -> Self {
        MetaValue::Integer(n)
    }
}

impl From<f64> for MetaValue {
    fn from(n: f64) -> Self {
        MetaValue::Float(n)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Flag(b)
    }
}

/// Framework-specific extras, bounded to [`MAX_METADATA_ENTRIES`] keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, MetaValue>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. Returns `false` when the map is full and `key` is new.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> bool {
        let key = key.into();
        if self.0.len() >= MAX_METADATA_ENTRIES && !self.0.contains_key(&key) {
            tracing::debug!("Metadata full, dropping key '{key}'");
            return false;
        }
        self.0.insert(key, value.into());
        true
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetaValue)> {
        self.0.iter()
    }
}

/// One normalized entry of a multi-agent conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub step_index: u64,
    pub timestamp: Timestamp,
    pub sender: String,
    /// `None` marks a broadcast.
    pub receiver: Option<String>,
    pub category: MessageCategory,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Message {
    pub fn new(
        step_index: u64,
        timestamp: Timestamp,
        sender: impl Into<String>,
        receiver: Option<&str>,
        category: MessageCategory,
        content: impl Into<String>,
    ) -> Self {
        Self {
            step_index,
            timestamp,
            sender: sender.into(),
            receiver: receiver.map(str::to_string),
            category,
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn is_broadcast(&self) -> bool {
        self.receiver.is_none()
    }

    /// The first [`CONTENT_PREVIEW_CHARS`] characters of the content.
    pub fn content_preview(&self) -> String {
        self.content.chars().take(CONTENT_PREVIEW_CHARS).collect()
    }
}

/// Known per-interaction metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionMeta {
    pub message_type: MessageCategory,
    pub content_preview: String,
}

/// One recorded communication along a directed edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub step_index: u64,
    pub timestamp: Timestamp,
    pub intent: Intent,
    /// Step index of the originating message.
    pub message_id: u64,
    pub metadata: InteractionMeta,
}

/// An agent in the communication graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub label: String,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub first_appearance: Timestamp,
    pub last_activity: Timestamp,
    #[serde(default)]
    pub metadata: Metadata,
}

impl NodeData {
    pub(crate) fn new(id: &str, seen_at: Timestamp) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            messages_sent: 0,
            messages_received: 0,
            first_appearance: seen_at,
            last_activity: seen_at,
            metadata: Metadata::new(),
        }
    }
}

/// A directed edge with its chronological interaction history.
///
/// `weight` always equals `interactions.len()`; the fields are private so the
/// only way to grow an edge is [`EdgeData::push`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    source: String,
    target: String,
    interactions: Vec<Interaction>,
    weight: u64,
}

impl EdgeData {
    pub(crate) fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            interactions: Vec::new(),
            weight: 0,
        }
    }

    /// Build an edge from an already ordered slice of interactions.
    pub(crate) fn from_slice(source: &str, target: &str, interactions: &[Interaction]) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            interactions: interactions.to_vec(),
            weight: interactions.len() as u64,
        }
    }

    pub(crate) fn push(&mut self, interaction: Interaction) {
        self.interactions.push(interaction);
        self.weight += 1;
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// `true` when the cached weight matches the history and the history is
    /// sorted by step. Useful after deserializing a snapshot from a client.
    pub fn is_consistent(&self) -> bool {
        self.weight == self.interactions.len() as u64
            && self
                .interactions
                .windows(2)
                .all(|w| w[0].step_index <= w[1].step_index)
    }
}

/// Errors raised by graph construction and querying.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Cannot build graph from empty message list")]
    EmptyInput,

    #[error("Graph not built yet: {0}")]
    NotBuilt(String),

    #[error("Invalid step {0}: step must be non-negative")]
    InvalidStep(i64),

    #[error("Invalid message at step {step}: {reason}")]
    InvalidMessage { step: u64, reason: String },
}

/// Convenience result type.
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_roundtrip() {
        for c in MessageCategory::ALL {
            assert_eq!(MessageCategory::from_name(c.as_str()), Some(c));
        }
        assert_eq!(
            MessageCategory::from_name("DELEGATION"),
            Some(MessageCategory::Delegation)
        );
        assert_eq!(MessageCategory::from_name("chatter"), None);
    }

    #[test]
    fn test_intent_serializes_snake_case() {
        let json = serde_json::to_string(&Intent::InformationResponse).unwrap();
        assert_eq!(json, "\"information_response\"");
        assert_eq!(Intent::default(), Intent::Unknown);
    }

    #[test]
    fn test_metadata_is_bounded() {
        let mut meta = Metadata::new();
        for i in 0..MAX_METADATA_ENTRIES {
            assert!(meta.insert(format!("k{i}"), i as i64));
        }
        assert!(!meta.insert("overflow", "x"));
        // Overwriting an existing key is still allowed when full.
        assert!(meta.insert("k0", "replaced"));
        assert_eq!(meta.len(), MAX_METADATA_ENTRIES);
        assert_eq!(meta.get("k0"), Some(&MetaValue::Text("replaced".into())));
    }

    #[test]
    fn test_content_preview_counts_chars() {
        let ts = Utc::now();
        let long = "é".repeat(150);
        let msg = Message::new(0, ts, "A", Some("B"), MessageCategory::Response, long);
        let preview = msg.content_preview();
        assert_eq!(preview.chars().count(), CONTENT_PREVIEW_CHARS);
    }

    #[test]
    fn test_edge_push_keeps_weight() {
        let ts = Utc::now();
        let mut edge = EdgeData::new("A", "B");
        for step in 0..3 {
            edge.push(Interaction {
                step_index: step,
                timestamp: ts,
                intent: Intent::Delegation,
                message_id: step,
                metadata: InteractionMeta {
                    message_type: MessageCategory::Delegation,
                    content_preview: String::new(),
                },
            });
        }
        assert_eq!(edge.weight(), 3);
        assert!(edge.is_consistent());
    }
}
