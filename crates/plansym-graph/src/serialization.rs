use plansym_core::errors::{ErrorInfo, SymError};
use serde::{Deserialize, Serialize};

use crate::graph::{Color, ColoredGraph};
use crate::renumber::Renumbering;

/// Serializes the graph to a compact binary representation using `bincode`.
pub fn graph_to_bytes(graph: &ColoredGraph) -> Result<Vec<u8>, SymError> {
    let serializable = SerializableGraph::from_graph(graph);
    bincode::serialize(&serializable)
        .map_err(|err| SymError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a graph from its binary representation.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<ColoredGraph, SymError> {
    let serializable: SerializableGraph = bincode::deserialize(bytes)
        .map_err(|err| SymError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_graph()
}

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &ColoredGraph) -> Result<String, SymError> {
    let serializable = SerializableGraph::from_graph(graph);
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| SymError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string.
pub fn graph_from_json(json: &str) -> Result<ColoredGraph, SymError> {
    let serializable: SerializableGraph = serde_json::from_str(json)
        .map_err(|err| SymError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_graph()
}

/// Restores a graph whose vertices carry sparse external identifiers.
///
/// Expects `{"vertices": [{"id": 40, "color": 1}, ...], "edges": [[7, 40], ...]}`;
/// identifiers are renumbered in ascending order.
pub fn sparse_graph_from_json(json: &str) -> Result<(ColoredGraph, Renumbering), SymError> {
    let sparse: SparseGraph = serde_json::from_str(json)
        .map_err(|err| SymError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    let vertices: Vec<(u64, Color)> = sparse.vertices.iter().map(|v| (v.id, v.color)).collect();
    let edges: Vec<(u64, u64)> = sparse.edges.iter().map(|&[a, b]| (a, b)).collect();
    ColoredGraph::from_sparse(&vertices, &edges)
}

#[derive(Debug, Deserialize)]
struct SparseVertex {
    id: u64,
    color: Color,
}

#[derive(Debug, Deserialize)]
struct SparseGraph {
    vertices: Vec<SparseVertex>,
    #[serde(default)]
    edges: Vec<[u64; 2]>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    colors: Vec<Color>,
    edges: Vec<[usize; 2]>,
}

impl SerializableGraph {
    fn from_graph(graph: &ColoredGraph) -> Self {
        Self {
            colors: graph.colors().to_vec(),
            edges: graph.edges().into_iter().map(|(a, b)| [a, b]).collect(),
        }
    }

    fn into_graph(self) -> Result<ColoredGraph, SymError> {
        let mut graph = ColoredGraph::with_colors(self.colors);
        for [a, b] in self.edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }
}
