//! End-to-end runs: filter-and-render, and the k-core table export

use std::path::Path;

use crate::config::Config;
use crate::data::{flows, tables};
use crate::error::VizError;
use crate::filter;
use crate::graph::algorithms::{core_numbers, top_core_nodes};
use crate::storage::{self, CoreSummary, ExportPaths};
use crate::viz::{self, RenderSummary};

/// Load both tables, filter them and write the HTML page.
///
/// Nothing is written unless loading, filtering and rendering all succeed.
pub fn run_render(config: &Config) -> Result<RenderSummary, VizError> {
    config.validate()?;

    // The tables are independent until filtering.
    let (nodes, edges) = rayon::join(
        || tables::load_nodes(&config.nodes_path),
        || tables::load_edges(&config.edges_path),
    );
    let nodes = nodes?;
    let edges = edges?;

    let filtered = filter::apply(&nodes, &edges, &config.criteria());
    let network = viz::build_network(&filtered, &config.node_style(), config.network_options());

    network.write_html(&config.output_path)
}

/// Build the host graph from a flow capture, compute core numbers and
/// export the node and edge tables consumed by [`run_render`].
pub fn run_analyze(
    input: &Path,
    output_dir: &Path,
    priority_tag: &str,
    top: usize,
) -> Result<(CoreSummary, ExportPaths), VizError> {
    let graph = flows::load_flow_graph(input, priority_tag)?;

    let cores = core_numbers(&graph);
    let max_core = cores.iter().copied().max().unwrap_or(0);
    log::info!("Max core number: {}", max_core);

    let summary = CoreSummary {
        node_count: graph.node_count,
        edge_count: graph.edge_count(),
        max_core,
        top_nodes: top_core_nodes(&graph, &cores, top),
    };

    for ranked in &summary.top_nodes {
        log::info!(
            "Core: {:>3} | Host: {:<15} | Label: {}",
            ranked.k_core,
            ranked.address,
            ranked.category
        );
    }

    let paths = storage::export_tables(&graph, &cores, &summary, output_dir)?;
    Ok((summary, paths))
}
