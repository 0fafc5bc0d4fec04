use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use plansym_aut::serde_io::{report_to_json, symmetries_to_json, write_json};
use plansym_aut::{detect_symmetries, DetectOptions, DreadnautEngine, EngineConfig};
use tracing::info;

use super::load_plan;

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// JSON file holding the partial plan.
    #[arg(long)]
    pub plan: PathBuf,
    /// YAML engine configuration; defaults to `dreadnaut` on the PATH.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory receiving `report.json` and `symmetries.json`. The report is
    /// printed when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Only derive symmetries from graph automorphisms.
    #[arg(long)]
    pub no_schema_swaps: bool,
}

pub fn run(args: &DetectArgs, verbose: bool) -> Result<(), Box<dyn Error>> {
    let plan = load_plan(&args.plan)?;
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.verbose |= verbose;
    let opts = DetectOptions {
        include_schema_swaps: !args.no_schema_swaps,
    };

    let detection = detect_symmetries(&plan, &DreadnautEngine::new(config), &opts)?;
    let report = report_to_json(&detection.report)?;

    match &args.out {
        Some(out) => {
            fs::create_dir_all(out)?;
            write_json(&out.join("report.json"), &report)?;
            write_json(
                &out.join("symmetries.json"),
                &symmetries_to_json(&detection.symmetries)?,
            )?;
            info!(
                out = %out.display(),
                symmetries = detection.symmetries.len(),
                "wrote detection artefacts"
            );
        }
        None => println!("{report}"),
    }
    Ok(())
}
