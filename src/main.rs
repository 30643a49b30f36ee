//! Entry point for plot-pr-climatology.
//! Parses arguments, sets up logging, and runs the pipeline once.

use anyhow::Context;
use clap::Parser;
use pr_climatology::cli::Args;
use pr_climatology::pipeline::{run, PipelineConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Invalid arguments, including an unknown season, exit here before any file is touched
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = PipelineConfig::from(&args);
    run(&config).with_context(|| {
        format!(
            "failed to plot {} climatology from {}",
            config.season,
            config.pr_file.display()
        )
    })?;

    Ok(())
}
