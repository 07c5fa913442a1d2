//! Block-paced wait helpers
//!
//! Thin wrappers that bind a chain read and a readiness check to the poll
//! engine. All of them wait one block between attempts and return the poll
//! engine's error unchanged when the budget runs out.

use futures::future::try_join_all;
use neutron_harness_core::poll::{PollError, Poller, PollerBuilder, TracingObserver};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::RestChainClient;
use crate::error::ChainError;
use crate::types::{
    AcknowledgementResult, Coin, RegisteredQuery, TestContractQuery, TransfersNumberResponse,
};

pub type WaitResult<T> = Result<T, PollError<ChainError>>;

fn poller(
    chain: &RestChainClient,
    attempts: u32,
    what: String,
) -> Poller<'_, RestChainClient, TracingObserver> {
    PollerBuilder::new(chain)
        .with_max_attempts(attempts)
        .with_observer(TracingObserver::new(what))
        .build()
}

/// Wait until interchain query `query_id` has a result submitted for a remote
/// height of at least `target_height`
///
/// Until the relayer submits the first result the module reports a remote
/// height of zero, so a freshly registered query simply reads as not ready.
pub async fn wait_for_icq_result_with_remote_height(
    chain: &RestChainClient,
    query_id: u64,
    target_height: u64,
    attempts: u32,
) -> WaitResult<RegisteredQuery> {
    poller(chain, attempts, format!("icq {} remote height", query_id))
        .poll(
            move || chain.registered_query(query_id),
            move |query: &RegisteredQuery| {
                query.last_submitted_result_remote_height.revision_height >= target_height
            },
        )
        .await
}

/// Wait for several interchain queries at once, one independent poller per
/// `(query_id, target_height)` pair
///
/// Fails with the first poller error; results are in input order.
pub async fn wait_for_icq_results(
    chain: &RestChainClient,
    targets: &[(u64, u64)],
    attempts: u32,
) -> WaitResult<Vec<RegisteredQuery>> {
    try_join_all(targets.iter().map(|&(query_id, target_height)| {
        wait_for_icq_result_with_remote_height(chain, query_id, target_height, attempts)
    }))
    .await
}

/// Wait until `contract` has recorded exactly `expected` incoming transfers
pub async fn wait_for_transfers_amount(
    chain: &RestChainClient,
    contract: &str,
    expected: u64,
    attempts: u32,
) -> WaitResult<u64> {
    let msg = TestContractQuery::GetTransfersNumber {};
    let msg = &msg;

    poller(chain, attempts, format!("transfers on {}", contract))
        .poll(
            move || chain.query_contract_smart::<_, TransfersNumberResponse>(contract, msg),
            move |response: &TransfersNumberResponse| response.transfers_number == expected,
        )
        .await
        .map(|response| response.transfers_number)
}

/// Wait for the acknowledgement of interchain transaction `sequence_id` sent
/// through interchain account `ica_id`
pub async fn get_ack(
    chain: &RestChainClient,
    contract: &str,
    ica_id: &str,
    sequence_id: u64,
    attempts: u32,
) -> WaitResult<AcknowledgementResult> {
    let msg = TestContractQuery::AcknowledgementResult {
        interchain_account_id: ica_id,
        sequence_id,
    };
    let msg = &msg;

    poller(chain, attempts, format!("ack {}/{}", ica_id, sequence_id))
        .poll_until_some(move || {
            chain.query_contract_smart::<_, Option<AcknowledgementResult>>(contract, msg)
        })
        .await
}

/// Wait until a contract-reported counter strictly exceeds `baseline`
///
/// Used for callback bookkeeping (last callback height, last sudo timestamp):
/// capture the value first, trigger the background process, then require
/// that it actually moved instead of merely existing.
pub async fn wait_for_progress<Q, R, X>(
    chain: &RestChainClient,
    contract: &str,
    msg: &Q,
    baseline: u64,
    extract: X,
    attempts: u32,
) -> WaitResult<R>
where
    Q: Serialize + ?Sized,
    R: DeserializeOwned + Serialize,
    X: Fn(&R) -> u64,
{
    poller(chain, attempts, format!("progress on {}", contract))
        .poll(
            move || chain.query_contract_smart::<Q, R>(contract, msg),
            move |response: &R| extract(response) > baseline,
        )
        .await
}

/// Wait until the `denom` balance of `address` satisfies `is_ready`
pub async fn wait_for_balance<P>(
    chain: &RestChainClient,
    address: &str,
    denom: &str,
    is_ready: P,
    attempts: u32,
) -> WaitResult<Coin>
where
    P: Fn(u128) -> bool,
{
    poller(chain, attempts, format!("balance {} of {}", denom, address))
        .poll(
            move || chain.balance(address, denom),
            move |coin: &Coin| is_ready(coin.amount),
        )
        .await
}
