use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use plansym_aut::serde_io::{read_json, write_json};
use plansym_aut::{AutomorphismEngine, DreadnautEngine, EngineConfig, SymmetryMetrics};
use plansym_core::{ErrorInfo, SymError};
use plansym_graph::{sparse_graph_from_json, Renumbering};
use serde::Serialize;
use tracing::info;

#[derive(Args, Debug)]
pub struct AutomorphismsArgs {
    /// JSON graph with sparse vertex ids: `{"vertices": [{"id", "color"}], "edges": [[a, b]]}`.
    #[arg(long)]
    pub graph: PathBuf,
    /// YAML engine configuration; defaults to `dreadnaut` on the PATH.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output file. The result is printed when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Automorphism group expressed in the caller's vertex ids.
#[derive(Debug, Serialize)]
struct ExternalAutomorphisms {
    group_order: u64,
    generators: Vec<Vec<Vec<u64>>>,
    orbits: Vec<Vec<u64>>,
    metrics: SymmetryMetrics,
}

pub fn run(args: &AutomorphismsArgs, verbose: bool) -> Result<(), Box<dyn Error>> {
    let text = read_json(&args.graph)?;
    let (graph, renumbering) = sparse_graph_from_json(&text)?;
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.verbose |= verbose;

    let result = DreadnautEngine::new(config).compute(&graph)?;
    let external = |points: &[usize]| -> Result<Vec<u64>, SymError> {
        points
            .iter()
            .map(|&v| {
                renumbering.external(v).ok_or_else(|| {
                    SymError::Graph(
                        ErrorInfo::new("unknown-vertex", "dense index has no external id")
                            .with_context("vertex", v.to_string()),
                    )
                })
            })
            .collect()
    };
    let report = ExternalAutomorphisms {
        group_order: result.group_order(),
        generators: result
            .group()
            .generators()
            .iter()
            .map(|g| {
                g.to_cycles()
                    .iter()
                    .map(|cycle| external(cycle.as_slice()))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<_, _>>()?,
        orbits: result
            .orbits()
            .iter()
            .map(|orbit| external(orbit.as_slice()))
            .collect::<Result<_, _>>()?,
        metrics: result.metrics(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    log_summary(&renumbering, &report);

    match &args.out {
        Some(out) => write_json(out, &json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn log_summary(renumbering: &Renumbering, report: &ExternalAutomorphisms) {
    info!(
        vertices = renumbering.len(),
        generators = report.generators.len(),
        group_order = report.group_order,
        orbits = report.orbits.len(),
        "computed automorphisms of external graph"
    );
}
