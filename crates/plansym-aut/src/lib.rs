#![deny(missing_docs)]
#![doc = "Symmetry detection for partial-order plans: plan encoding, automorphism \
computation through dreadnaut and causal-structure symmetries."]

/// Engine launch settings and pipeline switches.
pub mod config;
/// Coloured graph encoding of partial plans.
pub mod encoder;
/// Automorphism engines.
pub mod engine;
/// Permutations and generating sets.
pub mod permutation;
/// Text protocol spoken with dreadnaut.
pub mod protocol;
/// Automorphism results and orbit statistics.
pub mod result;
/// JSON helpers for reports and symmetries.
#[path = "serde.rs"]
pub mod serde_io;
/// Causal-structure symmetries.
pub mod symmetry;

pub use config::{DetectOptions, EngineConfig};
pub use encoder::{ColoredGraphEncoder, Palette, PlanEncoding};
pub use engine::{AutomorphismEngine, DreadnautEngine};
pub use permutation::{Group, Permutation};
pub use protocol::{parse_output, write_protocol, EngineOutput, OutputParser};
pub use result::{AutomorphismResult, SymmetryMetrics};
pub use symmetry::{
    automorphism_symmetries, is_involution, schema_swap_symmetries, AutomorphismSymmetries,
    CausalSymmetry,
};

use plansym_core::{PartialPlan, SymError};
use plansym_graph::canonical_hash;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Summary of one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymmetryReport {
    /// Structural hash of the encoded graph.
    pub graph_hash: String,
    /// Vertices of the encoded graph.
    pub vertex_count: usize,
    /// Edges of the encoded graph.
    pub edge_count: usize,
    /// Colours used by the encoding.
    pub color_count: usize,
    /// Number of automorphisms, truncated to 64 bits.
    pub group_order: u64,
    /// Generators reported by the engine.
    pub generator_count: usize,
    /// Orbit sizes in engine order.
    pub orbit_sizes: Vec<usize>,
    /// Orbit statistics.
    pub metrics: SymmetryMetrics,
    /// Symmetries derived from generators.
    pub automorphism_symmetries: usize,
    /// Generators dropped by validation.
    pub rejected_generators: usize,
    /// Generators that moved no literal head.
    pub inert_generators: usize,
    /// Symmetries derived from same-schema step swaps.
    pub schema_swap_symmetries: usize,
}

/// Everything produced by [`detect_symmetries`].
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetryDetection {
    /// Graph and literal lookup tables.
    pub encoding: PlanEncoding,
    /// Automorphism group of the graph.
    pub automorphisms: AutomorphismResult,
    /// Generator-derived symmetries followed by schema swaps, not deduplicated.
    pub symmetries: Vec<CausalSymmetry>,
    /// Run summary.
    pub report: SymmetryReport,
}

/// Encodes `plan`, computes its automorphisms with `engine` and converts
/// them into causal-structure symmetries.
pub fn detect_symmetries(
    plan: &PartialPlan,
    engine: &dyn AutomorphismEngine,
    opts: &DetectOptions,
) -> Result<SymmetryDetection, SymError> {
    let encoding = ColoredGraphEncoder::new(plan).encode()?;
    let automorphisms = engine.compute(encoding.graph())?;
    let harvest = automorphism_symmetries(&automorphisms, &encoding);
    let swaps = if opts.include_schema_swaps {
        schema_swap_symmetries(plan)
    } else {
        Vec::new()
    };

    let graph = encoding.graph();
    let report = SymmetryReport {
        graph_hash: canonical_hash(graph),
        vertex_count: graph.vertex_count(),
        edge_count: graph.edge_count(),
        color_count: encoding.palette().len(),
        group_order: automorphisms.group_order(),
        generator_count: automorphisms.group().len(),
        orbit_sizes: automorphisms.orbit_sizes(),
        metrics: automorphisms.metrics(),
        automorphism_symmetries: harvest.symmetries.len(),
        rejected_generators: harvest.rejected,
        inert_generators: harvest.inert,
        schema_swap_symmetries: swaps.len(),
    };
    info!(
        group_order = report.group_order,
        generators = report.generator_count,
        symmetries = report.automorphism_symmetries + report.schema_swap_symmetries,
        rejected = report.rejected_generators,
        "symmetry detection finished"
    );

    let mut symmetries = harvest.symmetries;
    symmetries.extend(swaps);
    Ok(SymmetryDetection {
        encoding,
        automorphisms,
        symmetries,
        report,
    })
}
