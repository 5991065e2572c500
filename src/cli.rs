use clap::Parser;

use crate::sweep::DEFAULT_ITERATIONS;

#[derive(Debug, Parser)]
#[command(name = "core-latency")]
#[command(about = "One-way core-to-core latency over every ordered pair of logical cores")]
pub struct Cli {
    /// Ping-pong rounds per (src, dst, lines) combination
    #[arg(default_value_t = DEFAULT_ITERATIONS, value_parser = clap::value_parser!(u64).range(1..))]
    pub iterations: u64,

    /// Log each combination to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
