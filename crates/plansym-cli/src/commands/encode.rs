use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use plansym_aut::protocol::protocol_text;
use plansym_aut::ColoredGraphEncoder;
use plansym_graph::{canonical_hash, graph_to_json};
use tracing::info;

use super::load_plan;

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// JSON file holding the partial plan.
    #[arg(long)]
    pub plan: PathBuf,
    /// Destination file.
    #[arg(long)]
    pub out: PathBuf,
    /// Write the dreadnaut input instead of the graph JSON.
    #[arg(long)]
    pub protocol: bool,
}

pub fn run(args: &EncodeArgs) -> Result<(), Box<dyn Error>> {
    let plan = load_plan(&args.plan)?;
    let encoding = ColoredGraphEncoder::new(&plan).encode()?;
    let graph = encoding.graph();
    let payload = if args.protocol {
        protocol_text(graph)
    } else {
        graph_to_json(graph)?
    };
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.out, payload)?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        hash = %canonical_hash(graph),
        out = %args.out.display(),
        "wrote plan encoding"
    );
    Ok(())
}
