//! Density and degree centrality over graph views.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::view::GraphView;

/// Structural metrics of one view.
///
/// Centrality maps are `None` when the view has fewer than two nodes: the
/// measure is undefined there, which is not the same as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree_centrality: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_degree_centrality: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_degree_centrality: Option<BTreeMap<String, f64>>,
}

impl GraphMetrics {
    /// The `k` nodes with the highest degree centrality, ties broken by id.
    pub fn top_central(&self, k: usize) -> Vec<(String, f64)> {
        let Some(centrality) = &self.degree_centrality else {
            return Vec::new();
        };
        let mut ranked: Vec<(String, f64)> = centrality
            .iter()
            .map(|(id, score)| (id.clone(), *score))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(k);
        ranked
    }
}

/// Compute density and centrality for a view.
///
/// Self-addressed edges stay in `edge_count` and add one to both the in- and
/// out-degree of their node, but are left out of density, which keeps density
/// within `[0, 1]`.
pub fn compute_metrics(view: &GraphView<'_>) -> GraphMetrics {
    let n = view.node_count();
    let edge_count = view.edge_count();

    let mut degrees: HashMap<&str, (usize, usize)> = view
        .nodes()
        .iter()
        .map(|node| (node.id.as_str(), (0, 0)))
        .collect();

    let mut linking = 0usize;
    for edge in view.edges() {
        if !edge.is_self_loop() {
            linking += 1;
        }
        if let Some(d) = degrees.get_mut(edge.source()) {
            d.1 += 1;
        }
        if let Some(d) = degrees.get_mut(edge.target()) {
            d.0 += 1;
        }
    }

    if n <= 1 {
        return GraphMetrics {
            node_count: n,
            edge_count,
            density: 0.0,
            degree_centrality: None,
            in_degree_centrality: None,
            out_degree_centrality: None,
        };
    }

    let scale = (n - 1) as f64;
    let density = linking as f64 / (n as f64 * scale);

    let centrality = |pick: fn(&(usize, usize)) -> usize| -> BTreeMap<String, f64> {
        degrees
            .iter()
            .map(|(id, d)| (id.to_string(), pick(d) as f64 / scale))
            .collect()
    };

    GraphMetrics {
        node_count: n,
        edge_count,
        density,
        degree_centrality: Some(centrality(|d| d.0 + d.1)),
        in_degree_centrality: Some(centrality(|d| d.0)),
        out_degree_centrality: Some(centrality(|d| d.1)),
    }
}
