//! Graph construction module

use crate::graph::CompressedGraph;
use std::collections::HashMap;

/// Builder for incrementally constructing a host graph from flows
pub struct GraphBuilder {
    /// Mapping from address strings to node indices
    id_to_index: HashMap<String, u32>,

    /// Address per node index
    node_ids: Vec<String>,

    /// Label per node index
    categories: Vec<String>,

    /// Adjacency lists, may hold duplicates until `build`
    adjacency_lists: Vec<Vec<u32>>,

    /// Labels containing this tag replace a node's existing label
    priority_tag: String,
}

impl GraphBuilder {
    /// Create a new builder; `priority_tag` marks labels that win over others
    pub fn new(priority_tag: impl Into<String>) -> Self {
        Self::with_capacity(0, priority_tag)
    }

    pub fn with_capacity(capacity: usize, priority_tag: impl Into<String>) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            categories: Vec::with_capacity(capacity),
            adjacency_lists: Vec::with_capacity(capacity),
            priority_tag: priority_tag.into(),
        }
    }

    /// Get or create the node for an address, applying the label rule
    pub fn get_or_create_node(&mut self, id: &str, label: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            let current = &mut self.categories[idx as usize];
            if label.contains(&self.priority_tag) && !current.contains(&self.priority_tag) {
                *current = label.to_string();
            }
            return idx;
        }

        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.categories.push(label.to_string());
        self.adjacency_lists.push(Vec::new());

        idx
    }

    /// Record one flow between two hosts
    pub fn add_flow(&mut self, src_id: &str, dst_id: &str, label: &str) {
        let src = self.get_or_create_node(src_id, label);
        let dst = self.get_or_create_node(dst_id, label);

        if src == dst {
            return;
        }

        self.adjacency_lists[src as usize].push(dst);
        self.adjacency_lists[dst as usize].push(src);
    }

    /// Collapse parallel flows and build the compressed graph
    pub fn build(mut self) -> CompressedGraph {
        for list in &mut self.adjacency_lists {
            list.sort_unstable();
            list.dedup();
        }

        let node_count = self.node_ids.len();
        let edge_count: usize = self.adjacency_lists.iter().map(|list| list.len()).sum();

        let mut graph = CompressedGraph::with_capacity(node_count, edge_count);
        let mut offset = 0u32;
        for list in &self.adjacency_lists {
            graph.edges.extend_from_slice(list);
            offset += list.len() as u32;
            graph.offsets.push(offset);
        }

        graph.node_count = node_count;
        graph.node_ids = self.node_ids;
        graph.categories = self.categories;
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_flows_and_self_loops_collapse() {
        let mut builder = GraphBuilder::new("Botnet");
        builder.add_flow("a", "b", "Normal");
        builder.add_flow("b", "a", "Normal");
        builder.add_flow("a", "b", "Normal");
        builder.add_flow("c", "c", "Normal");

        let graph = builder.build();
        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0]);
        assert_eq!(graph.degree(2), 0);
        assert!(graph.has_edge(0, 1));
        assert!(!graph.has_edge(0, 2));
    }

    #[test]
    fn priority_label_overrides_earlier_label() {
        let mut builder = GraphBuilder::new("Botnet");
        builder.add_flow("a", "b", "flow=Background");
        builder.add_flow("a", "c", "flow=From-Botnet-V42");
        builder.add_flow("a", "d", "flow=Normal");

        let graph = builder.build();
        assert_eq!(graph.categories[0], "flow=From-Botnet-V42");
        assert_eq!(graph.categories[1], "flow=Background");
        assert_eq!(graph.categories[3], "flow=Normal");
    }

    #[test]
    fn first_priority_label_sticks() {
        let mut builder = GraphBuilder::new("Botnet");
        builder.add_flow("a", "b", "flow=From-Botnet-V1");
        builder.add_flow("a", "b", "flow=To-Botnet-V2");

        let graph = builder.build();
        assert_eq!(graph.categories[0], "flow=From-Botnet-V1");
    }

    #[test]
    fn edge_pairs_lists_each_edge_once() {
        let mut builder = GraphBuilder::new("Botnet");
        builder.add_flow("a", "b", "x");
        builder.add_flow("c", "a", "x");
        builder.add_flow("b", "c", "x");

        let graph = builder.build();
        let pairs: Vec<_> = graph.edge_pairs().collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }
}
