use std::collections::BTreeMap;

use plansym_core::errors::SymError;

use crate::graph::{graph_error, Color, ColoredGraph, ContextExt};

/// Order preserving bijection between sparse external vertex identifiers and
/// the dense range `[0, n)` required by [`ColoredGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renumbering {
    dense: BTreeMap<u64, usize>,
    external: Vec<u64>,
}

impl Renumbering {
    /// Builds a renumbering from arbitrary identifiers; duplicates collapse.
    pub fn from_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        let mut external: Vec<u64> = ids.into_iter().collect();
        external.sort_unstable();
        external.dedup();
        let dense = external
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();
        Self { dense, external }
    }

    /// Dense index assigned to `id`.
    pub fn dense(&self, id: u64) -> Result<usize, SymError> {
        self.dense
            .get(&id)
            .copied()
            .ok_or_else(|| {
                graph_error("unknown-vertex", "identifier was not renumbered")
                    .with_context("id", id)
            })
    }

    /// External identifier of dense index `v`.
    pub fn external(&self, v: usize) -> Option<u64> {
        self.external.get(v).copied()
    }

    /// Number of renumbered identifiers.
    pub fn len(&self) -> usize {
        self.external.len()
    }

    /// Whether no identifier was renumbered.
    pub fn is_empty(&self) -> bool {
        self.external.is_empty()
    }
}

impl ColoredGraph {
    /// Builds a graph from sparse `(id, colour)` vertices and `(id, id)`
    /// edges, renumbering ids into `[0, n)` in ascending id order.
    pub fn from_sparse(
        vertices: &[(u64, Color)],
        edges: &[(u64, u64)],
    ) -> Result<(ColoredGraph, Renumbering), SymError> {
        let renumbering = Renumbering::from_ids(vertices.iter().map(|(id, _)| *id));
        if renumbering.len() != vertices.len() {
            return Err(graph_error("duplicate-vertex", "vertex identifiers must be unique")
                .with_context("vertices", vertices.len())
                .with_context("distinct", renumbering.len()));
        }
        let mut colors = vec![0; vertices.len()];
        for &(id, color) in vertices {
            colors[renumbering.dense(id)?] = color;
        }
        let mut graph = ColoredGraph::with_colors(colors);
        for &(a, b) in edges {
            graph.add_edge(renumbering.dense(a)?, renumbering.dense(b)?)?;
        }
        Ok((graph, renumbering))
    }
}
