use sha2::{Digest, Sha256};

use crate::graph::ColoredGraph;

/// Computes the structural hash of a coloured graph.
///
/// Two graphs hash equal exactly when they have the same vertex numbering,
/// colours and edge set.
pub fn canonical_hash(graph: &ColoredGraph) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"coloured-graph:v1");
    hasher.update((graph.vertex_count() as u64).to_le_bytes());
    for &color in graph.colors() {
        hasher.update(color.to_le_bytes());
    }
    let edges = graph.edges();
    hasher.update((edges.len() as u64).to_le_bytes());
    for (a, b) in edges {
        hasher.update((a as u64).to_le_bytes());
        hasher.update((b as u64).to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}
