//! Poll-based wait commands

use anyhow::Result;
use camino::Utf8Path;
use neutron_harness_chain::wait::{get_ack, wait_for_icq_result_with_remote_height, wait_for_transfers_amount};
use neutron_harness_chain::ScenarioContext;
use serde_json::json;

use super::{load_context, poll_failure, resolve_contract};
use crate::cli::{PollArgs, WaitAckArgs, WaitQueryArgs, WaitTransfersArgs};
use crate::output;

fn attempts(ctx: &ScenarioContext, poll: &PollArgs) -> u32 {
    poll.attempts.unwrap_or(ctx.config().polling.max_attempts)
}

pub async fn query(args: WaitQueryArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = load_context(config)?;
    let what = format!(
        "interchain query {} at remote height {}",
        args.query_id, args.height
    );

    let spinner = (!args.poll.json).then(|| output::spinner(&format!("Waiting for {}", what)));
    let result = wait_for_icq_result_with_remote_height(
        ctx.neutron(),
        args.query_id,
        args.height,
        attempts(&ctx, &args.poll),
    )
    .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let query = result.map_err(|err| poll_failure(err, &what))?;
    if args.poll.json {
        output::json(&query)?;
    } else {
        output::success(&format!("Interchain query {} has a result", query.id));
        output::kv("Owner", &query.owner);
        output::kv("Type", &query.query_type);
        output::kv(
            "Remote height",
            &query
                .last_submitted_result_remote_height
                .revision_height
                .to_string(),
        );
        output::kv(
            "Local height",
            &query.last_submitted_result_local_height.to_string(),
        );
    }
    Ok(())
}

pub async fn transfers(args: WaitTransfersArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = load_context(config)?;
    let contract = resolve_contract(&ctx, &args.contract);
    let what = format!("{} transfers on {}", args.expected, contract);

    let spinner = (!args.poll.json).then(|| output::spinner(&format!("Waiting for {}", what)));
    let result = wait_for_transfers_amount(
        ctx.neutron(),
        &contract,
        args.expected,
        attempts(&ctx, &args.poll),
    )
    .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let transfers = result.map_err(|err| poll_failure(err, &what))?;
    if args.poll.json {
        output::json(&json!({ "contract": contract, "transfers_number": transfers }))?;
    } else {
        output::success(&format!("{} recorded {} transfers", contract, transfers));
    }
    Ok(())
}

pub async fn ack(args: WaitAckArgs, config: Option<&Utf8Path>) -> Result<()> {
    let ctx = load_context(config)?;
    let contract = resolve_contract(&ctx, &args.contract);
    let what = format!(
        "acknowledgement {}/{} on {}",
        args.ica_id, args.sequence, contract
    );

    let spinner = (!args.poll.json).then(|| output::spinner(&format!("Waiting for {}", what)));
    let result = get_ack(
        ctx.neutron(),
        &contract,
        &args.ica_id,
        args.sequence,
        attempts(&ctx, &args.poll),
    )
    .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let ack = result.map_err(|err| poll_failure(err, &what))?;
    if args.poll.json {
        output::json(&ack)?;
    } else if ack.is_success() {
        output::success(&format!("Acknowledgement received: {:?}", ack));
    } else {
        output::error(&format!("Acknowledgement received: {:?}", ack));
    }
    Ok(())
}
