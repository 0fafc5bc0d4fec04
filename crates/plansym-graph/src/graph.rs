use std::collections::{BTreeMap, BTreeSet};

use plansym_core::errors::{ErrorInfo, SymError};

/// Colour label attached to every vertex.
pub type Color = u32;

/// Undirected simple graph over the dense vertex range `[0, n)` where every
/// vertex carries exactly one colour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColoredGraph {
    colors: Vec<Color>,
    adjacency: Vec<BTreeSet<usize>>,
}

impl ColoredGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an edgeless graph with one vertex per entry of `colors`.
    pub fn with_colors(colors: Vec<Color>) -> Self {
        let adjacency = vec![BTreeSet::new(); colors.len()];
        Self { colors, adjacency }
    }

    /// Adds a vertex with the given colour and returns its identifier.
    pub fn add_vertex(&mut self, color: Color) -> usize {
        self.colors.push(color);
        self.adjacency.push(BTreeSet::new());
        self.colors.len() - 1
    }

    /// Links `a` and `b`. Returns `false` when the edge already existed.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<bool, SymError> {
        self.ensure_vertex(a)?;
        self.ensure_vertex(b)?;
        if a == b {
            return Err(graph_error("self-loop", "coloured graphs are simple")
                .with_context("vertex", a));
        }
        let inserted = self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
        Ok(inserted)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.colors.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour of vertex `v`.
    pub fn color(&self, v: usize) -> Result<Color, SymError> {
        self.ensure_vertex(v)?;
        Ok(self.colors[v])
    }

    /// Colours indexed by vertex.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Neighbours of `v` in ascending order.
    pub fn neighbours(&self, v: usize) -> Result<impl Iterator<Item = usize> + '_, SymError> {
        self.ensure_vertex(v)?;
        Ok(self.adjacency[v].iter().copied())
    }

    /// Number of neighbours of `v`.
    pub fn degree(&self, v: usize) -> Result<usize, SymError> {
        self.ensure_vertex(v)?;
        Ok(self.adjacency[v].len())
    }

    /// Whether `a` and `b` are adjacent. Unknown vertices are never adjacent.
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency
            .get(a)
            .map(|neighbours| neighbours.contains(&b))
            .unwrap_or(false)
    }

    /// Edges as `(low, high)` pairs in lexicographic order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (a, neighbours) in self.adjacency.iter().enumerate() {
            for &b in neighbours.range(a + 1..) {
                edges.push((a, b));
            }
        }
        edges
    }

    /// Vertices grouped by colour: cells ordered by increasing colour id,
    /// vertices ascending within a cell. Unused colours yield no cell.
    pub fn color_cells(&self) -> Vec<Vec<usize>> {
        let mut cells: BTreeMap<Color, Vec<usize>> = BTreeMap::new();
        for (vertex, &color) in self.colors.iter().enumerate() {
            cells.entry(color).or_default().push(vertex);
        }
        cells.into_values().collect()
    }

    /// Checks whether `mapping` is a colour and adjacency preserving
    /// bijection of the vertex set.
    pub fn is_automorphism(&self, mapping: &[usize]) -> bool {
        let n = self.vertex_count();
        if mapping.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &image in mapping {
            if image >= n || seen[image] {
                return false;
            }
            seen[image] = true;
        }
        for (v, &image) in mapping.iter().enumerate() {
            if self.colors[v] != self.colors[image] {
                return false;
            }
        }
        self.edges()
            .into_iter()
            .all(|(a, b)| self.has_edge(mapping[a], mapping[b]))
    }

    fn ensure_vertex(&self, v: usize) -> Result<(), SymError> {
        if v < self.colors.len() {
            Ok(())
        } else {
            Err(graph_error("unknown-vertex", "vertex does not exist")
                .with_context("vertex", v)
                .with_context("vertex_count", self.colors.len()))
        }
    }
}

pub(crate) fn graph_error(code: impl Into<String>, message: impl Into<String>) -> SymError {
    SymError::Graph(ErrorInfo::new(code, message))
}

pub(crate) trait ContextExt {
    fn with_context(self, key: impl Into<String>, value: impl ToString) -> SymError;
}

impl ContextExt for SymError {
    fn with_context(self, key: impl Into<String>, value: impl ToString) -> SymError {
        match self {
            SymError::Graph(info) => SymError::Graph(info.with_context(key, value.to_string())),
            other => other,
        }
    }
}
