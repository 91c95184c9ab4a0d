//! arckit — token-contract CLI for AVM networks.

use clap::Parser;

mod commands;
mod helpers;

#[derive(Debug, Parser)]
#[command(version, about = "ARC-200/ARC-72 token contract toolkit")]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

fn main() -> anyhow::Result<()> {
    // Install the tracing subscriber that will listen for events and filters.
    // We try to use the `RUST_LOG` environment variable and default to
    // RUST_LOG=info if unset.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    Cli::parse().command.run()
}
