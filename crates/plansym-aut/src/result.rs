use plansym_core::{ErrorInfo, SymError};
use serde::{Deserialize, Serialize};

use crate::permutation::{Group, Permutation};
use crate::protocol::EngineOutput;

/// Automorphism group of a coloured graph as reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomorphismResult {
    group: Group,
    orbits: Vec<Vec<usize>>,
    group_order: u64,
    vertex_count: usize,
}

/// Orbit based symmetry statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SymmetryMetrics {
    /// Entropy of the orbit size distribution, in bits.
    pub graph_entropy: f64,
    /// Mowshowitz symmetry index.
    pub mowshowitz_symmetry_index: f64,
    /// Largest orbit over vertex count.
    pub vertex_symmetry_index: f64,
    /// Smallest orbit over largest orbit.
    pub orbit_homogeneity_index: f64,
    /// Mean orbit size relative to the largest orbit.
    pub orbit_deviation_index: f64,
}

impl AutomorphismResult {
    /// Bundles engine results after checking that every generator acts on
    /// `vertex_count` points and that `orbits` partitions `[0, vertex_count)`.
    pub fn new(
        group: Group,
        orbits: Vec<Vec<usize>>,
        group_order: u64,
        vertex_count: usize,
    ) -> Result<Self, SymError> {
        if group.domain_size() != vertex_count {
            return Err(violation(
                ErrorInfo::new("generator-domain", "generators act on the wrong domain")
                    .with_context("vertex_count", vertex_count.to_string())
                    .with_context("domain_size", group.domain_size().to_string()),
            ));
        }
        let mut covered = vec![false; vertex_count];
        for (idx, orbit) in orbits.iter().enumerate() {
            if orbit.is_empty() {
                return Err(violation(
                    ErrorInfo::new("empty-orbit", "orbits must be non-empty")
                        .with_context("orbit", idx.to_string()),
                ));
            }
            for &v in orbit {
                if v >= vertex_count {
                    return Err(violation(
                        ErrorInfo::new("orbit-range", "orbit names an unknown vertex")
                            .with_context("vertex", v.to_string())
                            .with_context("vertex_count", vertex_count.to_string()),
                    ));
                }
                if covered[v] {
                    return Err(violation(
                        ErrorInfo::new("orbit-overlap", "vertex appears in two orbits")
                            .with_context("vertex", v.to_string()),
                    ));
                }
                covered[v] = true;
            }
        }
        if let Some(missing) = covered.iter().position(|c| !c) {
            return Err(violation(
                ErrorInfo::new("orbit-cover", "orbits do not cover every vertex")
                    .with_context("vertex", missing.to_string()),
            ));
        }
        Ok(Self {
            group,
            orbits,
            group_order,
            vertex_count,
        })
    }

    /// Result for a graph with no symmetry besides the identity.
    pub fn trivial(vertex_count: usize) -> Self {
        Self {
            group: Group::trivial(vertex_count),
            orbits: (0..vertex_count).map(|v| vec![v]).collect(),
            group_order: 1,
            vertex_count,
        }
    }

    /// Converts parsed engine output for a graph of `vertex_count` vertices.
    pub fn from_output(output: EngineOutput, vertex_count: usize) -> Result<Self, SymError> {
        let generators = output
            .generators
            .iter()
            .map(|cycles| Permutation::from_cycles(vertex_count, cycles))
            .collect::<Result<Vec<_>, _>>()?;
        let group = Group::new(vertex_count, generators)?;
        Self::new(group, output.orbits, output.group_order, vertex_count)
    }

    /// Generating set.
    pub fn group(&self) -> &Group {
        &self.group
    }

    /// Orbit partition of the vertex set.
    pub fn orbits(&self) -> &[Vec<usize>] {
        &self.orbits
    }

    /// Number of automorphisms, truncated to 64 bits.
    pub fn group_order(&self) -> u64 {
        self.group_order
    }

    /// Number of vertices of the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Orbit sizes in orbit order.
    pub fn orbit_sizes(&self) -> Vec<usize> {
        self.orbits.iter().map(Vec::len).collect()
    }

    fn max_orbit(&self) -> f64 {
        self.orbits.iter().map(Vec::len).max().unwrap_or(0) as f64
    }

    fn min_orbit(&self) -> f64 {
        self.orbits.iter().map(Vec::len).min().unwrap_or(0) as f64
    }

    /// `-sum (s/n) log2(s/n)` over orbit sizes `s`.
    pub fn graph_entropy(&self) -> f64 {
        if self.vertex_count == 0 {
            return 0.0;
        }
        let n = self.vertex_count as f64;
        -self
            .orbits
            .iter()
            .map(|orbit| {
                let p = orbit.len() as f64 / n;
                p * p.log2()
            })
            .sum::<f64>()
    }

    /// `sum(s log2 s) / n + log2(order)`.
    pub fn mowshowitz_symmetry_index(&self) -> f64 {
        if self.vertex_count == 0 {
            return 0.0;
        }
        let n = self.vertex_count as f64;
        let spread: f64 = self
            .orbits
            .iter()
            .map(|orbit| {
                let s = orbit.len() as f64;
                s * s.log2()
            })
            .sum();
        spread / n + (self.group_order.max(1) as f64).log2()
    }

    /// Largest orbit size over vertex count.
    pub fn vertex_symmetry_index(&self) -> f64 {
        if self.vertex_count == 0 {
            return 0.0;
        }
        self.max_orbit() / self.vertex_count as f64
    }

    /// Smallest orbit size over largest orbit size.
    pub fn orbit_homogeneity_index(&self) -> f64 {
        if self.orbits.is_empty() {
            return 0.0;
        }
        self.min_orbit() / self.max_orbit()
    }

    /// Mean of `s / max s` over orbits.
    pub fn orbit_deviation_index(&self) -> f64 {
        if self.orbits.is_empty() {
            return 0.0;
        }
        let max = self.max_orbit();
        let total: f64 = self.orbits.iter().map(|orbit| orbit.len() as f64 / max).sum();
        total / self.orbits.len() as f64
    }

    /// All statistics at once.
    pub fn metrics(&self) -> SymmetryMetrics {
        SymmetryMetrics {
            graph_entropy: self.graph_entropy(),
            mowshowitz_symmetry_index: self.mowshowitz_symmetry_index(),
            vertex_symmetry_index: self.vertex_symmetry_index(),
            orbit_homogeneity_index: self.orbit_homogeneity_index(),
            orbit_deviation_index: self.orbit_deviation_index(),
        }
    }
}

fn violation(info: ErrorInfo) -> SymError {
    SymError::ProtocolViolation(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbits_must_partition_the_vertices() {
        let group = Group::trivial(3);
        assert!(AutomorphismResult::new(group.clone(), vec![vec![0, 1], vec![2]], 2, 3).is_ok());
        for orbits in [
            vec![vec![0, 1]],
            vec![vec![0, 1], vec![1, 2]],
            vec![vec![0, 1, 2], vec![]],
            vec![vec![0, 1, 2, 3]],
        ] {
            let err = AutomorphismResult::new(group.clone(), orbits, 1, 3).unwrap_err();
            assert!(matches!(err, SymError::ProtocolViolation(_)));
        }
    }

    #[test]
    fn empty_graph_has_zero_metrics() {
        let result = AutomorphismResult::trivial(0);
        assert_eq!(result.metrics(), SymmetryMetrics::default());
        assert_eq!(result.group_order(), 1);
    }

    #[test]
    fn rigid_graph_metrics() {
        let result = AutomorphismResult::trivial(4);
        let metrics = result.metrics();
        assert!((metrics.graph_entropy - 2.0).abs() < 1e-12);
        assert!(metrics.mowshowitz_symmetry_index.abs() < 1e-12);
        assert!((metrics.vertex_symmetry_index - 0.25).abs() < 1e-12);
        assert!((metrics.orbit_homogeneity_index - 1.0).abs() < 1e-12);
        assert!((metrics.orbit_deviation_index - 1.0).abs() < 1e-12);
    }
}
