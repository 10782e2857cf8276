//! CSV loading for the node and edge tables

use std::path::Path;

use polars::prelude::*;

use crate::data::{EdgeRecord, NodeRecord};
use crate::error::InputError;

/// Load the node table. Requires `id`, `label`, `category` and `k_core`;
/// any other column is ignored.
pub fn load_nodes(path: &Path) -> Result<Vec<NodeRecord>, InputError> {
    log::info!("Reading node table: {}", path.display());
    let df = read_csv(path)?;

    let ids = int_column(&df, path, "id")?;
    let labels = text_column(&df, path, "label")?;
    let categories = text_column(&df, path, "category")?;
    let k_cores = float_column(&df, path, "k_core")?;

    let nodes: Vec<NodeRecord> = ids
        .into_iter()
        .zip(labels)
        .zip(categories)
        .zip(k_cores)
        .map(|(((id, label), category), k_core)| NodeRecord {
            id,
            label,
            category,
            k_core,
        })
        .collect();

    log::info!("Loaded {} nodes", nodes.len());
    Ok(nodes)
}

/// Load the edge table. Requires `source` and `target`.
pub fn load_edges(path: &Path) -> Result<Vec<EdgeRecord>, InputError> {
    log::info!("Reading edge table: {}", path.display());
    let df = read_csv(path)?;

    let sources = int_column(&df, path, "source")?;
    let targets = int_column(&df, path, "target")?;

    let edges: Vec<EdgeRecord> = sources
        .into_iter()
        .zip(targets)
        .map(|(source, target)| EdgeRecord { source, target })
        .collect();

    log::info!("Loaded {} edges", edges.len());
    Ok(edges)
}

fn read_csv(path: &Path) -> Result<DataFrame, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let parse_error = |source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    };

    // Read every cell as text; columns are typed per field in `typed_column`.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)?;

    log::debug!("{} schema: {:?}", path.display(), df.schema());
    Ok(df)
}

fn typed_column(
    df: &DataFrame,
    path: &Path,
    name: &str,
    dtype: &DataType,
) -> Result<Column, InputError> {
    let column = df.column(name).map_err(|_| InputError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    })?;

    // Non-strict cast from text: unparseable cells become nulls and are
    // reported per row.
    column.cast(dtype).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid_value(path: &Path, name: &str, row: usize) -> InputError {
    InputError::InvalidValue {
        path: path.to_path_buf(),
        column: name.to_string(),
        row,
    }
}

fn int_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<i64>, InputError> {
    let column = typed_column(df, path, name, &DataType::Int64)?;
    let values = column.i64().map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| value.ok_or_else(|| invalid_value(path, name, row)))
        .collect()
}

fn float_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<f64>, InputError> {
    let column = typed_column(df, path, name, &DataType::Float64)?;
    let values = column.f64().map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(invalid_value(path, name, row)),
        })
        .collect()
}

/// Empty cells read as null; they become empty strings here.
fn text_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<String>, InputError> {
    let column = typed_column(df, path, name, &DataType::String)?;
    let values = column.str().map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(values
        .into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect())
}
