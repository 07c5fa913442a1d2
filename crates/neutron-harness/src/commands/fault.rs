//! Fault injection commands

use anyhow::{Context, Result};
use camino::Utf8Path;

use super::load_context;
use crate::cli::FaultArgs;
use crate::output;

pub async fn pause(args: FaultArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = load_context(config)?;
    ctx.faults()
        .pause(&args.target)
        .await
        .with_context(|| format!("Failed to pause {}", args.target))?;
    output::success(&format!("Paused {}", args.target));
    Ok(())
}

pub async fn unpause(args: FaultArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = load_context(config)?;
    ctx.faults()
        .unpause(&args.target)
        .await
        .with_context(|| format!("Failed to unpause {}", args.target))?;
    output::success(&format!("Unpaused {}", args.target));
    Ok(())
}
