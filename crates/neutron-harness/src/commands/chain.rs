//! Height and block commands

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde_json::json;

use super::{client_for, load_context};
use crate::cli::{HeightArgs, WaitBlocksArgs};
use crate::output;

pub async fn height(args: HeightArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = load_context(config)?;
    let client = client_for(&ctx, args.chain);

    let height = client
        .latest_height()
        .await
        .with_context(|| format!("Failed to read latest height of {}", client.chain_id()))?;

    if args.json {
        output::json(&json!({ "chain_id": client.chain_id(), "height": height }))?;
    } else {
        println!("{}", height);
    }
    Ok(())
}

pub async fn wait_blocks(args: WaitBlocksArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = load_context(config)?;
    let client = client_for(&ctx, args.chain);

    let spinner = (!args.json).then(|| {
        output::spinner(&format!(
            "Waiting for {} blocks on {}",
            args.blocks,
            client.chain_id()
        ))
    });
    let result = client.wait_for_blocks(args.blocks).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let height = result
        .with_context(|| format!("Failed waiting for blocks on {}", client.chain_id()))?;

    if args.json {
        output::json(&json!({ "chain_id": client.chain_id(), "height": height }))?;
    } else {
        output::success(&format!("{} reached height {}", client.chain_id(), height));
    }
    Ok(())
}
