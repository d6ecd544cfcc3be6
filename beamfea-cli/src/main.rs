use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

const ABOUT: &str = "\
Linear static analysis of 3D beam frames.

The configuration file names the CSV tables of the model (nodes, elems,
props, and optionally bcs, forces, ties) and may carry an options object
controlling output files and verbosity.";

#[derive(Parser)]
#[command(name = "beamfea", about = ABOUT)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short = 'c', long = "config")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = beamfea_core::load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let default_level = if config.options.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let inputs = beamfea_core::load_inputs(&config).context("failed to load model inputs")?;

    let summary = beamfea_core::solve(
        &inputs.job,
        &inputs.bcs,
        &inputs.forces,
        &inputs.ties,
        &[],
        &config.options,
    )
    .context("analysis failed")?;

    if config.options.verbose {
        println!("{}", summary.full_report());
    }

    Ok(())
}
