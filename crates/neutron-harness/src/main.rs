//! neutron-harness CLI
//!
//! Entry point for driving a local Neutron + counterparty test environment
//! from scripts: read heights, wait on cross-chain state and inject faults.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Height(args) => commands::chain::height(args, config).await,
        Commands::WaitBlocks(args) => commands::chain::wait_blocks(args, config).await,
        Commands::WaitQuery(args) => commands::wait::query(args, config).await,
        Commands::WaitTransfers(args) => commands::wait::transfers(args, config).await,
        Commands::WaitAck(args) => commands::wait::ack(args, config).await,
        Commands::Pause(args) => commands::fault::pause(args, config).await,
        Commands::Unpause(args) => commands::fault::unpause(args, config).await,
        Commands::Config(args) => commands::config::run(args, config),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Poll progress (not-ready values) shows up from -v
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
