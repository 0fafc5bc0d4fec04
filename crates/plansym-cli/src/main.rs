use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    automorphisms::{self, AutomorphismsArgs},
    detect::{self, DetectArgs},
    encode::{self, EncodeArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "plansym", version, about = "Symmetry detection for partial-order plans")]
struct Cli {
    /// Log debug events, including every line printed by dreadnaut.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the automorphism group of a coloured graph with sparse vertex ids.
    Automorphisms(AutomorphismsArgs),
    /// Detect causal-structure symmetries of a plan.
    Detect(DetectArgs),
    /// Write the coloured graph encoding of a plan.
    Encode(EncodeArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Automorphisms(args) => automorphisms::run(&args, cli.verbose),
        Command::Detect(args) => detect::run(&args, cli.verbose),
        Command::Encode(args) => encode::run(&args),
    }
}
