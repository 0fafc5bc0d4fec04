use std::fmt::{self, Display};

use plansym_core::{ErrorInfo, SymError};
use serde::{Deserialize, Serialize};

/// Bijection of `{0, .., n-1}` stored as an explicit image table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation {
    mapping: Vec<usize>,
}

impl Permutation {
    /// Permutation fixing every point of `{0, .., n-1}`.
    pub fn identity(n: usize) -> Self {
        Self {
            mapping: (0..n).collect(),
        }
    }

    /// Builds a permutation from its image table.
    pub fn from_mapping(mapping: Vec<usize>) -> Result<Self, SymError> {
        let n = mapping.len();
        let mut hit = vec![false; n];
        for (point, &image) in mapping.iter().enumerate() {
            if image >= n {
                return Err(invalid(
                    ErrorInfo::new("out-of-range", "image outside the domain")
                        .with_context("point", point.to_string())
                        .with_context("image", image.to_string())
                        .with_context("domain_size", n.to_string()),
                ));
            }
            if hit[image] {
                return Err(invalid(
                    ErrorInfo::new("not-injective", "image is hit more than once")
                        .with_context("image", image.to_string()),
                ));
            }
            hit[image] = true;
        }
        Ok(Self { mapping })
    }

    /// Builds a permutation of `{0, .., n-1}` from disjoint cycles, each
    /// cycle `(a1 a2 .. ak)` mapping `a_i` to `a_{i+1 mod k}`. Points absent
    /// from every cycle are fixed.
    pub fn from_cycles<C: AsRef<[usize]>>(n: usize, cycles: &[C]) -> Result<Self, SymError> {
        let mut mapping: Vec<usize> = (0..n).collect();
        let mut found = vec![false; n];
        for cycle in cycles {
            let cycle = cycle.as_ref();
            for (idx, &point) in cycle.iter().enumerate() {
                if point >= n {
                    return Err(invalid(
                        ErrorInfo::new("out-of-range", "cycle point outside the domain")
                            .with_context("point", point.to_string())
                            .with_context("domain_size", n.to_string())
                            .with_context("cycles", format_cycles(cycles)),
                    ));
                }
                if found[point] {
                    return Err(invalid(
                        ErrorInfo::new("duplicate-point", "point repeats across cycles")
                            .with_context("point", point.to_string())
                            .with_context("cycles", format_cycles(cycles)),
                    ));
                }
                found[point] = true;
                mapping[point] = cycle[(idx + 1) % cycle.len()];
            }
        }
        Ok(Self { mapping })
    }

    /// Size of the domain.
    pub fn domain_size(&self) -> usize {
        self.mapping.len()
    }

    /// Image of `point`.
    ///
    /// # Panics
    ///
    /// Panics when `point` is outside the domain.
    pub fn apply(&self, point: usize) -> usize {
        self.mapping[point]
    }

    /// Image table indexed by point.
    pub fn mapping(&self) -> &[usize] {
        &self.mapping
    }

    /// Permutation applying `other` first and then `self`.
    pub fn compose(&self, other: &Permutation) -> Result<Permutation, SymError> {
        if self.domain_size() != other.domain_size() {
            return Err(SymError::DomainMismatch(
                ErrorInfo::new("compose", "permutations act on different domains")
                    .with_context("left", self.domain_size().to_string())
                    .with_context("right", other.domain_size().to_string()),
            ));
        }
        Ok(Permutation {
            mapping: other.mapping.iter().map(|&p| self.mapping[p]).collect(),
        })
    }

    /// Inverse permutation.
    pub fn inverse(&self) -> Permutation {
        let mut mapping = vec![0; self.mapping.len()];
        for (point, &image) in self.mapping.iter().enumerate() {
            mapping[image] = point;
        }
        Permutation { mapping }
    }

    /// Whether every point is fixed.
    pub fn is_identity(&self) -> bool {
        self.mapping.iter().enumerate().all(|(p, &i)| p == i)
    }

    /// Points not fixed by the permutation, ascending.
    pub fn moved_points(&self) -> impl Iterator<Item = usize> + '_ {
        self.mapping
            .iter()
            .enumerate()
            .filter(|(p, &i)| *p != i)
            .map(|(p, _)| p)
    }

    /// Maximal non-trivial cycles, each starting from its smallest point and
    /// listed in order of that point. Fixed points are omitted.
    pub fn to_cycles(&self) -> Vec<Vec<usize>> {
        let mut cycles = Vec::new();
        let mut visited = vec![false; self.mapping.len()];
        for start in 0..self.mapping.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut cycle = vec![start];
            let mut next = self.mapping[start];
            while next != start {
                visited[next] = true;
                cycle.push(next);
                next = self.mapping[next];
            }
            if cycle.len() > 1 {
                cycles.push(cycle);
            }
        }
        cycles
    }

    /// Order of the permutation: the lcm of its cycle lengths.
    pub fn order(&self) -> u64 {
        self.to_cycles()
            .iter()
            .map(|cycle| cycle.len() as u64)
            .fold(1, |acc, len| acc / gcd(acc, len) * len)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = SymError;

    fn try_from(value: Vec<usize>) -> Result<Self, Self::Error> {
        Permutation::from_mapping(value)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(value: Permutation) -> Self {
        value.mapping
    }
}

impl Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cycles = self.to_cycles();
        if cycles.is_empty() {
            return f.write_str("()");
        }
        f.write_str(&format_cycles(&cycles))
    }
}

fn invalid(info: ErrorInfo) -> SymError {
    SymError::InvalidBijection(info)
}

fn format_cycles<C: AsRef<[usize]>>(cycles: &[C]) -> String {
    let mut out = String::new();
    for cycle in cycles {
        out.push('(');
        let points: Vec<String> = cycle.as_ref().iter().map(usize::to_string).collect();
        out.push_str(&points.join(" "));
        out.push(')');
    }
    out
}

/// Ordered list of generators of a permutation group. No closure is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    domain_size: usize,
    generators: Vec<Permutation>,
}

impl Group {
    /// Creates a group from generators that all act on `{0, .., domain_size-1}`.
    pub fn new(domain_size: usize, generators: Vec<Permutation>) -> Result<Self, SymError> {
        if let Some((idx, perm)) = generators
            .iter()
            .enumerate()
            .find(|(_, perm)| perm.domain_size() != domain_size)
        {
            return Err(SymError::DomainMismatch(
                ErrorInfo::new("group-generator", "generator acts on a different domain")
                    .with_context("generator", idx.to_string())
                    .with_context("expected", domain_size.to_string())
                    .with_context("actual", perm.domain_size().to_string()),
            ));
        }
        Ok(Self {
            domain_size,
            generators,
        })
    }

    /// Group generated by nothing: only the identity.
    pub fn trivial(domain_size: usize) -> Self {
        Self {
            domain_size,
            generators: Vec::new(),
        }
    }

    /// Generators in the order they were supplied.
    pub fn generators(&self) -> &[Permutation] {
        &self.generators
    }

    /// Size of the common domain.
    pub fn domain_size(&self) -> usize {
        self.domain_size
    }

    /// Number of generators.
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Whether the generating set is empty.
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, perm) in self.generators.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{perm}")?;
        }
        Ok(())
    }
}
