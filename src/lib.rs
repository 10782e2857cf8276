//! Core library functions for the botnet k-core visualizer

pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod graph;
pub mod pipeline;
pub mod storage;
pub mod viz;

pub use config::Config;
pub use error::VizError;
pub use pipeline::{run_analyze, run_render};
