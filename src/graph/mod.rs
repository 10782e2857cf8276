//! Host graph representation and k-core decomposition

pub mod algorithms;
pub mod builder;
pub mod compressed;

pub use builder::GraphBuilder;
pub use compressed::CompressedGraph;
