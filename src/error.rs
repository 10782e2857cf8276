//! Error types for the visualization pipeline.
//!
//! Every failure is fatal: the run produces a single artifact, so errors are
//! surfaced to the caller and nothing is retried.

use std::path::PathBuf;

use polars::prelude::PolarsError;

/// Top-level error for a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum VizError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Rejected configuration values. Raised at load time, never during filtering.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("threshold must be a finite number, got {0}")]
    InvalidThreshold(f64),

    #[error("`{field}` must not be empty")]
    EmptyValue { field: &'static str },
}

/// Failures while loading the node, edge or flow tables.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("{} is missing required column `{column}`", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{} has a missing or non-numeric `{column}` value at row {row}", path.display())]
    InvalidValue {
        path: PathBuf,
        column: String,
        row: usize,
    },
}

/// Failures while turning a network into HTML.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{count} of {total} edges reference nodes that were never added")]
    DanglingEdges { count: usize, total: usize },

    #[error("failed to serialize graph data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to format page: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Failures while writing output artifacts.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write table {}: {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_edge_message_reports_count() {
        let err = VizError::from(RenderError::DanglingEdges { count: 3, total: 10 });
        assert_eq!(
            err.to_string(),
            "Render error: 3 of 10 edges reference nodes that were never added"
        );
    }

    #[test]
    fn missing_column_message_names_column() {
        let err = InputError::MissingColumn {
            path: PathBuf::from("nodes.csv"),
            column: "k_core".to_string(),
        };
        assert_eq!(err.to_string(), "nodes.csv is missing required column `k_core`");
    }
}
