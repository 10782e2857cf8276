//! Visualization generation module

pub mod network;

pub use network::{Network, NetworkOptions, RenderSummary, VizNode};

use crate::data::NodeRecord;
use crate::filter::FilteredGraph;

/// Per-node presentation rules
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    /// Categories containing this tag get the highlight color
    pub category_tag: String,
    pub highlight_color: String,
    pub default_color: String,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            category_tag: "Botnet".to_string(),
            highlight_color: "red".to_string(),
            default_color: "skyblue".to_string(),
        }
    }
}

impl NodeStyle {
    pub fn color_for(&self, category: &str) -> &str {
        if category.contains(self.category_tag.as_str()) {
            self.highlight_color.as_str()
        } else {
            self.default_color.as_str()
        }
    }

    pub fn viz_node(&self, node: &NodeRecord) -> VizNode {
        VizNode {
            id: node.id,
            label: node.label.clone(),
            title: format!("K-core: {}", node.k_core),
            color: self.color_for(&node.category).to_string(),
        }
    }
}

/// Populate a network with the filtered nodes, then the filtered edges
pub fn build_network(filtered: &FilteredGraph<'_>, style: &NodeStyle, options: NetworkOptions) -> Network {
    log::info!(
        "Building network with {} nodes and {} edges",
        filtered.nodes.len(),
        filtered.edges.len()
    );

    let mut network = Network::new(options);
    for node in &filtered.nodes {
        network.add_node(style.viz_node(node));
    }
    for edge in &filtered.edges {
        network.add_edge(edge.source, edge.target);
    }

    network
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_categories_are_highlighted() {
        let style = NodeStyle::default();
        assert_eq!(style.color_for("flow=From-Botnet-V42"), "red");
        assert_eq!(style.color_for("flow=Normal"), "skyblue");
    }

    #[test]
    fn tooltip_shows_k_core() {
        let style = NodeStyle::default();
        let node = NodeRecord {
            id: 4,
            label: "147.32.84.165".to_string(),
            category: "flow=Background".to_string(),
            k_core: 12.0,
        };

        let viz = style.viz_node(&node);
        assert_eq!(viz.id, 4);
        assert_eq!(viz.label, "147.32.84.165");
        assert_eq!(viz.title, "K-core: 12");
        assert_eq!(viz.color, "skyblue");
    }
}
