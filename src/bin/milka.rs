//! Milka CLI Binary

use anyhow::Context;
use clap::Parser;
use milka::logging::init_logging;
use milka::tooling::cli::{Cli, CliContext};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CliContext::load_config(cli.root.clone(), cli.config.clone())
        .context("Failed to load configuration")?;
    init_logging(Some(&cli.logging_config(&config.logging)))
        .context("Failed to initialize logging")?;

    let context = CliContext::new(config).context("Failed to build sketch index")?;
    let output = context.execute(&cli.command)?;
    println!("{}", output);
    Ok(())
}
