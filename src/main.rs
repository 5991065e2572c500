use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use core_latency::cli::Cli;
use core_latency::report::CsvReport;
use core_latency::sweep::{self, SweepConfig};
use core_latency::{affinity, sampler};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config =
        SweepConfig::new(cli.iterations, affinity::core_ids()).context("cannot run sweep")?;

    let mut report = CsvReport::new(io::stdout().lock());
    report.header().context("failed to write header")?;

    sweep::run(&config, sampler::sample, |result| report.row(result))?;

    Ok(())
}
