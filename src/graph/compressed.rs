//! Memory-efficient host graph representation

use std::mem;

/// Compressed sparse representation of a simple undirected graph.
///
/// Every edge is stored in both endpoints' adjacency lists, so
/// `edges.len()` is twice the number of undirected edges.
#[derive(Debug, Clone)]
pub struct CompressedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: `offsets[i]..offsets[i+1]` is the neighbor range of node i
    pub offsets: Vec<u32>,

    /// Concatenated, sorted neighbor lists
    pub edges: Vec<u32>,

    /// Host address per node index
    pub node_ids: Vec<String>,

    /// Traffic label per node index
    pub categories: Vec<String>,
}

impl CompressedGraph {
    /// Create an empty graph with pre-allocated capacity
    pub fn with_capacity(node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count: 0,
            offsets: {
                let mut offsets = Vec::with_capacity(node_count + 1);
                offsets.push(0);
                offsets
            },
            edges: Vec::with_capacity(edge_count),
            node_ids: Vec::with_capacity(node_count),
            categories: Vec::with_capacity(node_count),
        }
    }

    /// Neighbors of a node, sorted ascending
    pub fn neighbors(&self, node: usize) -> &[u32] {
        let start = self.offsets[node] as usize;
        let end = self.offsets[node + 1] as usize;
        &self.edges[start..end]
    }

    pub fn degree(&self, node: usize) -> usize {
        (self.offsets[node + 1] - self.offsets[node]) as usize
    }

    #[cfg(test)]
    pub fn has_edge(&self, a: usize, b: u32) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// Each undirected edge once, as `(low, high)` in index order
    pub fn edge_pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.node_count).flat_map(move |node| {
            self.neighbors(node)
                .iter()
                .filter(move |&&other| other as usize > node)
                .map(move |&other| (node as u32, other))
        })
    }

    /// Estimate memory usage in bytes
    pub fn memory_usage(&self) -> usize {
        let base = mem::size_of::<Self>();
        let offsets = self.offsets.capacity() * mem::size_of::<u32>();
        let edges = self.edges.capacity() * mem::size_of::<u32>();
        let strings = self
            .node_ids
            .iter()
            .chain(self.categories.iter())
            .map(|s| s.capacity())
            .sum::<usize>();

        base + offsets + edges + strings
    }
}
