//! Results persistence module

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde::Serialize;
use serde_json::to_string_pretty;

use crate::error::OutputError;
use crate::graph::algorithms::CoreRanking;
use crate::graph::CompressedGraph;

/// Headline numbers written next to the exported tables
#[derive(Debug, Clone, Serialize)]
pub struct CoreSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub max_core: u32,
    pub top_nodes: Vec<CoreRanking>,
}

/// Paths of the files written by [`export_tables`]
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub summary: PathBuf,
}

/// Write `nodes.csv`, `edges.csv` and `core_summary.json` into `output_dir`.
///
/// The tables use the column layout the render pipeline reads back.
pub fn export_tables(
    graph: &CompressedGraph,
    cores: &[u32],
    summary: &CoreSummary,
    output_dir: &Path,
) -> Result<ExportPaths, OutputError> {
    log::info!("Saving node and edge tables to {}", output_dir.display());

    fs::create_dir_all(output_dir).map_err(|source| OutputError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let paths = ExportPaths {
        nodes: output_dir.join("nodes.csv"),
        edges: output_dir.join("edges.csv"),
        summary: output_dir.join("core_summary.json"),
    };

    save_nodes(graph, cores, &paths.nodes)?;
    save_edges(graph, &paths.edges)?;
    save_summary(summary, &paths.summary)?;

    log::info!("Results saved successfully");
    Ok(paths)
}

fn save_nodes(graph: &CompressedGraph, cores: &[u32], path: &Path) -> Result<(), OutputError> {
    let table_error = |source| OutputError::Table {
        path: path.to_path_buf(),
        source,
    };

    let ids: Vec<u32> = (0..graph.node_count as u32).collect();
    let mut df = df!(
        "id" => ids,
        "label" => graph.node_ids.clone(),
        "category" => graph.categories.clone(),
        "k_core" => cores.to_vec(),
    )
    .map_err(table_error)?;

    write_csv(&mut df, path)
}

fn save_edges(graph: &CompressedGraph, path: &Path) -> Result<(), OutputError> {
    let (sources, targets): (Vec<u32>, Vec<u32>) = graph.edge_pairs().unzip();
    let mut df = df!(
        "source" => sources,
        "target" => targets,
    )
    .map_err(|source| OutputError::Table {
        path: path.to_path_buf(),
        source,
    })?;

    write_csv(&mut df, path)
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), OutputError> {
    let mut file = File::create(path).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|source| OutputError::Table {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

fn save_summary(summary: &CoreSummary, path: &Path) -> Result<(), OutputError> {
    let json = to_string_pretty(summary).map_err(|source| OutputError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, json).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tables::{load_edges, load_nodes};
    use crate::graph::algorithms::{core_numbers, top_core_nodes};
    use crate::graph::GraphBuilder;

    #[test]
    fn exported_tables_load_back() {
        let mut builder = GraphBuilder::new("Botnet");
        builder.add_flow("10.0.0.1", "10.0.0.2", "flow=From-Botnet-V42");
        builder.add_flow("10.0.0.2", "10.0.0.3", "flow=Normal, with comma");
        builder.add_flow("10.0.0.3", "10.0.0.1", "flow=Normal");
        let graph = builder.build();
        let cores = core_numbers(&graph);
        let summary = CoreSummary {
            node_count: graph.node_count,
            edge_count: graph.edge_count(),
            max_core: 2,
            top_nodes: top_core_nodes(&graph, &cores, 2),
        };

        let dir = tempfile::tempdir().unwrap();
        let paths = export_tables(&graph, &cores, &summary, dir.path()).unwrap();

        let nodes = load_nodes(&paths.nodes).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].label, "10.0.0.1");
        assert_eq!(nodes[0].category, "flow=From-Botnet-V42");
        assert_eq!(nodes[1].category, "flow=From-Botnet-V42");
        assert_eq!(nodes[2].category, "flow=Normal, with comma");
        assert!(nodes.iter().all(|n| n.k_core == 2.0));

        let edges = load_edges(&paths.edges).unwrap();
        let pairs: Vec<_> = edges.iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);

        let raw = fs::read_to_string(&paths.summary).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["max_core"], 2);
        assert_eq!(json["top_nodes"].as_array().unwrap().len(), 2);
    }
}
