//! Command implementations

pub mod chain;
pub mod config;
pub mod fault;
pub mod wait;

use anyhow::{Context, Result};
use camino::Utf8Path;
use neutron_harness_chain::{ChainError, RestChainClient, ScenarioContext};
use neutron_harness_core::poll::PollError;
use neutron_harness_core::{HarnessConfig, HierarchicalConfigLoader};
use tracing::debug;

use crate::cli::ChainArg;
use crate::output;

/// Load the harness config, from `path` when given
pub fn load_config(path: Option<&Utf8Path>) -> Result<HarnessConfig> {
    let loader = HierarchicalConfigLoader::new()?;
    let config = match path {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("Failed to load {}", path))?,
        None => loader.load().context("Failed to load harness configuration")?,
    };
    Ok(config)
}

pub fn load_context(path: Option<&Utf8Path>) -> Result<ScenarioContext> {
    let config = load_config(path)?;
    ScenarioContext::from_config(config).context("Failed to set up chain clients")
}

pub fn client_for(ctx: &ScenarioContext, chain: ChainArg) -> &RestChainClient {
    match chain {
        ChainArg::Neutron => ctx.neutron(),
        ChainArg::Counterparty => ctx.counterparty(),
    }
}

/// Registered contract address for `name_or_address`, or the argument itself
pub fn resolve_contract(ctx: &ScenarioContext, name_or_address: &str) -> String {
    ctx.contract(name_or_address)
        .map(str::to_string)
        .unwrap_or_else(|_| name_or_address.to_string())
}

/// Turn a poll failure into a CLI error, printing the attempt history first
pub fn poll_failure(err: PollError<ChainError>, what: &str) -> anyhow::Error {
    if let Some(history) = err.history() {
        debug!(attempts = history.len(), "poll history");
        for line in history.to_string().lines() {
            output::error(line);
        }
    }
    anyhow::Error::new(err).context(format!("Gave up waiting for {}", what))
}
