#![deny(missing_docs)]

//! Vertex-coloured undirected graphs over dense vertex ranges, the input
//! format of the automorphism engines in `plansym-aut`.

mod graph;
mod hash;
mod renumber;
mod serialization;

pub use graph::{Color, ColoredGraph};
pub use hash::canonical_hash;
pub use renumber::Renumbering;

/// Re-export serialization helpers for downstream crates.
pub use serialization::{
    graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json, sparse_graph_from_json,
};
