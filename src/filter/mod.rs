//! Node and edge selection

use std::collections::HashSet;

use crate::data::{EdgeRecord, NodeRecord};

/// Which nodes survive filtering
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Minimum k-core, exclusive
    pub threshold: f64,

    /// Case-sensitive substring of `category` that forces inclusion
    pub category_tag: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::new(5.0, "Botnet")
    }
}

impl FilterCriteria {
    pub fn new(threshold: f64, category_tag: impl Into<String>) -> Self {
        Self {
            threshold,
            category_tag: category_tag.into(),
        }
    }

    pub fn retains(&self, node: &NodeRecord) -> bool {
        node.k_core > self.threshold || node.category.contains(self.category_tag.as_str())
    }
}

/// Result of filtering, borrowing from the loaded tables
#[derive(Debug, Clone, Default)]
pub struct FilteredGraph<'a> {
    pub nodes: Vec<&'a NodeRecord>,
    pub edges: Vec<&'a EdgeRecord>,
}

/// Nodes matching the criteria, in input order
pub fn filter_nodes<'a>(nodes: &'a [NodeRecord], criteria: &FilterCriteria) -> Vec<&'a NodeRecord> {
    nodes.iter().filter(|node| criteria.retains(node)).collect()
}

pub fn retained_ids(nodes: &[&NodeRecord]) -> HashSet<i64> {
    nodes.iter().map(|node| node.id).collect()
}

/// Edges whose endpoints are both retained, in input order
pub fn filter_edges<'a>(edges: &'a [EdgeRecord], ids: &HashSet<i64>) -> Vec<&'a EdgeRecord> {
    edges
        .iter()
        .filter(|edge| ids.contains(&edge.source) && ids.contains(&edge.target))
        .collect()
}

/// Filter nodes, then keep the edges induced by the surviving ids
pub fn apply<'a>(
    nodes: &'a [NodeRecord],
    edges: &'a [EdgeRecord],
    criteria: &FilterCriteria,
) -> FilteredGraph<'a> {
    let kept_nodes = filter_nodes(nodes, criteria);
    let ids = retained_ids(&kept_nodes);
    let kept_edges = filter_edges(edges, &ids);

    log::info!(
        "Kept {}/{} nodes (k_core > {} or category contains {:?}) and {}/{} edges",
        kept_nodes.len(),
        nodes.len(),
        criteria.threshold,
        criteria.category_tag,
        kept_edges.len(),
        edges.len()
    );

    FilteredGraph {
        nodes: kept_nodes,
        edges: kept_edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, category: &str, k_core: f64) -> NodeRecord {
        NodeRecord {
            id,
            label: format!("n{id}"),
            category: category.to_string(),
            k_core,
        }
    }

    fn edge(source: i64, target: i64) -> EdgeRecord {
        EdgeRecord { source, target }
    }

    #[test]
    fn threshold_is_strict() {
        let criteria = FilterCriteria::default();
        assert!(!criteria.retains(&node(1, "Normal", 5.0)));
        assert!(criteria.retains(&node(2, "Normal", 5.5)));
    }

    #[test]
    fn tag_match_is_case_sensitive_substring() {
        let criteria = FilterCriteria::default();
        assert!(criteria.retains(&node(1, "flow=From-Botnet-V42", 0.0)));
        assert!(!criteria.retains(&node(2, "flow=from-botnet", 0.0)));
    }

    #[test]
    fn reference_scenario() {
        let nodes = vec![node(1, "Botnet", 2.0), node(2, "Normal", 10.0), node(3, "Normal", 1.0)];
        let edges = vec![edge(1, 2), edge(2, 3), edge(1, 3)];

        let filtered = apply(&nodes, &edges, &FilterCriteria::default());

        let ids: Vec<i64> = filtered.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(filtered.edges, vec![&edge(1, 2)]);
    }

    #[test]
    fn dangling_edges_drop_out() {
        let nodes = vec![node(1, "Botnet", 0.0), node(2, "Botnet", 0.0)];
        let edges = vec![edge(1, 99), edge(1, 2), edge(42, 2)];

        let filtered = apply(&nodes, &edges, &FilterCriteria::default());
        assert_eq!(filtered.edges, vec![&edge(1, 2)]);
    }

    #[test]
    fn nothing_retained_is_not_an_error() {
        let nodes = vec![node(1, "Normal", 1.0)];
        let edges = vec![edge(1, 1)];

        let filtered = apply(&nodes, &edges, &FilterCriteria::default());
        assert!(filtered.nodes.is_empty());
        assert!(filtered.edges.is_empty());
    }
}
