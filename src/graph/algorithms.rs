//! Graph algorithms for analysis

use serde::Serialize;

use crate::graph::CompressedGraph;

/// A node and its core number, as reported in the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreRanking {
    pub index: u32,
    pub address: String,
    pub category: String,
    pub k_core: u32,
}

/// Core number of every node by bucket peeling, O(V + E).
///
/// Nodes are removed in order of current degree; removing a node lowers the
/// degree of neighbors that are still above the current level. A node whose
/// degree drops is pushed again into its new bucket and the stale entry is
/// skipped once the node has been processed.
pub fn core_numbers(graph: &CompressedGraph) -> Vec<u32> {
    let node_count = graph.node_count;
    let mut core: Vec<usize> = (0..node_count).map(|node| graph.degree(node)).collect();
    let max_degree = core.iter().copied().max().unwrap_or(0);

    let mut buckets: Vec<Vec<u32>> = vec![Vec::new(); max_degree + 1];
    for (node, &degree) in core.iter().enumerate() {
        buckets[degree].push(node as u32);
    }

    let mut processed = vec![false; node_count];

    for k in 0..=max_degree {
        let mut cursor = 0;
        while cursor < buckets[k].len() {
            let node = buckets[k][cursor] as usize;
            cursor += 1;

            if processed[node] {
                continue;
            }
            processed[node] = true;

            for &neighbor in graph.neighbors(node) {
                let neighbor = neighbor as usize;
                if core[neighbor] > k {
                    core[neighbor] -= 1;
                    buckets[core[neighbor]].push(neighbor as u32);
                }
            }
        }
    }

    log::debug!("Computed core numbers for {} nodes", node_count);
    core.into_iter().map(|c| c as u32).collect()
}

/// Highest-core nodes first, ties broken by node index
pub fn top_core_nodes(graph: &CompressedGraph, cores: &[u32], limit: usize) -> Vec<CoreRanking> {
    let mut order: Vec<usize> = (0..graph.node_count).collect();
    order.sort_by(|&a, &b| cores[b].cmp(&cores[a]).then(a.cmp(&b)));

    order
        .into_iter()
        .take(limit)
        .map(|node| CoreRanking {
            index: node as u32,
            address: graph.node_ids[node].clone(),
            category: graph.categories[node].clone(),
            k_core: cores[node],
        })
        .collect()
}
