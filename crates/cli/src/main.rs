use anyhow::Result;
use clap::Parser;

use cppcheck_runner::Cli;

fn main() -> Result<()> {
    // Standard output is the build log, keep diagnostics on stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    Cli::parse().command.execute()
}
