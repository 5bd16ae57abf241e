//! CommuGraph: temporal communication graphs for multi-agent conversation logs.
//!
//! Messages are folded once into a [`TemporalGraph`]; any number of cheap,
//! read-only [`GraphView`]s can then be cut from it at a step bound and turned
//! into snapshots or metrics.

pub mod builder;
pub mod classify;
pub mod graph;
pub mod metrics;
pub mod parser;
pub mod snapshot;
pub mod types;
pub mod view;

pub use builder::GraphBuilder;
pub use classify::{classify, IntentClassifier, RuleClassifier};
pub use graph::TemporalGraph;
pub use metrics::{compute_metrics, GraphMetrics};
pub use parser::{AutoGenParser, LogParser, ParseError, ParseResult, ParserRegistry};
pub use snapshot::{GraphSnapshot, SnapshotMeta};
pub use types::*;
pub use view::{validate_step, EdgeView, GraphView};
