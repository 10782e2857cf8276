//! Data loading module

pub mod flows;
pub mod tables;

use serde::{Deserialize, Serialize};

/// One row of the node table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node identifier, assumed unique
    pub id: i64,

    /// Display string
    pub label: String,

    /// Free-form tags, matched by substring
    pub category: String,

    /// Coreness value computed upstream
    pub k_core: f64,
}

/// One row of the edge table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: i64,
    pub target: i64,
}
