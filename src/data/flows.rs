//! NetFlow CSV handling for host graph construction

use std::path::Path;

use polars::prelude::*;

use crate::error::InputError;
use crate::graph::{CompressedGraph, GraphBuilder};

const SRC_COLUMN: &str = "SrcAddr";
const DST_COLUMN: &str = "DstAddr";
const LABEL_COLUMN: &str = "Label";

/// Build the host graph from a bidirectional NetFlow export.
///
/// Every row with both addresses and a label adds an undirected edge between
/// the two hosts. Rows missing any of the three are skipped.
pub fn load_flow_graph(path: &Path, priority_tag: &str) -> Result<CompressedGraph, InputError> {
    log::info!("Reading flow file: {}", path.display());

    if !path.exists() {
        return Err(InputError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let parse_error = |source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut lf = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()
        .map_err(parse_error)?;

    let schema = lf.collect_schema().map_err(parse_error)?;
    for column in [SRC_COLUMN, DST_COLUMN, LABEL_COLUMN] {
        if !schema.contains(column) {
            return Err(InputError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let df = lf
        .select([
            col(SRC_COLUMN).cast(DataType::String),
            col(DST_COLUMN).cast(DataType::String),
            col(LABEL_COLUMN).cast(DataType::String),
        ])
        .collect()
        .map_err(parse_error)?;

    log::info!("Loaded {} flow records", df.height());

    let text = |name: &str| -> Result<StringChunked, InputError> {
        let column = df.column(name).map_err(parse_error)?;
        Ok(column.str().map_err(parse_error)?.clone())
    };
    let sources = text(SRC_COLUMN)?;
    let targets = text(DST_COLUMN)?;
    let labels = text(LABEL_COLUMN)?;

    let mut builder = GraphBuilder::with_capacity(df.height() / 4, priority_tag);
    let mut skipped = 0usize;

    for ((src, dst), label) in sources.into_iter().zip(targets.into_iter()).zip(labels.into_iter()) {
        match (src, dst, label) {
            (Some(src), Some(dst), Some(label)) => builder.add_flow(src, dst, label),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} incomplete flow records", skipped);
    }

    let graph = builder.build();
    log::info!(
        "Graph built: {} nodes, {} edges (~{:.1} MB)",
        graph.node_count,
        graph.edge_count(),
        graph.memory_usage() as f64 / (1024.0 * 1024.0)
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str = "StartTime,Dur,Proto,SrcAddr,Sport,Dir,DstAddr,Dport,State,sTos,dTos,TotPkts,TotBytes,SrcBytes,Label";

    #[test]
    fn builds_host_graph_from_flows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.binetflow");
        let body = [
            HEADER,
            "2011/08/10 09:46:53,1.0,tcp,147.32.84.165,1025,->,147.32.80.9,53,CON,0,0,2,200,100,flow=From-Botnet-V42-UDP-DNS",
            "2011/08/10 09:46:54,1.0,tcp,147.32.84.165,1026,->,147.32.80.9,53,CON,0,0,2,200,100,flow=From-Botnet-V42-UDP-DNS",
            "2011/08/10 09:46:55,1.0,tcp,147.32.84.229,443,<->,147.32.80.9,80,CON,0,0,2,200,100,flow=Background",
            "2011/08/10 09:46:56,1.0,tcp,147.32.84.229,443,<->,,80,CON,0,0,2,200,100,flow=Background",
        ]
        .join("\n");
        fs::write(&path, body).unwrap();

        let graph = load_flow_graph(&path, "Botnet").unwrap();
        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_ids[0], "147.32.84.165");
        assert_eq!(graph.categories[1], "flow=From-Botnet-V42-UDP-DNS");
        assert_eq!(graph.categories[2], "flow=Background");
    }

    #[test]
    fn missing_label_column_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.csv");
        fs::write(&path, "SrcAddr,DstAddr\n1.1.1.1,2.2.2.2\n").unwrap();

        match load_flow_graph(&path, "Botnet").unwrap_err() {
            InputError::MissingColumn { column, .. } => assert_eq!(column, "Label"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
