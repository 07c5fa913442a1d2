//! Shared helpers for the chain integration tests
//!
//! Every test gets its own wiremock server standing in for a node's REST API.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use neutron_harness_chain::RestChainClient;
use neutron_harness_core::types::{BlockWaitConfig, ChainEndpoint};
use neutron_harness_core::HarnessConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const LATEST_BLOCK_PATH: &str = "/cosmos/base/tendermint/v1beta1/blocks/latest";
pub const REGISTERED_QUERY_PATH: &str = "/neutron/interchainqueries/registered_query";
pub const CONTRACT: &str = "neutron1contract";

/// Fast block pacing so tests finish in milliseconds
pub fn fast_blocks() -> BlockWaitConfig {
    BlockWaitConfig {
        poll_interval_ms: 5,
        timeout_secs: 1,
    }
}

pub fn endpoint(server: &MockServer) -> ChainEndpoint {
    ChainEndpoint {
        chain_id: "test-1".to_string(),
        rest_url: server.uri(),
        denom: "untrn".to_string(),
        request_timeout_secs: 5,
    }
}

pub fn client(server: &MockServer) -> RestChainClient {
    RestChainClient::new(&endpoint(server), fast_blocks()).unwrap()
}

/// Config pointing both chains at `server`
pub fn config(server: &MockServer) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.neutron = endpoint(server);
    config.counterparty = ChainEndpoint {
        chain_id: "test-2".to_string(),
        ..endpoint(server)
    };
    config.blocks = fast_blocks();
    config
}

fn latest_block_body(height: u64) -> Value {
    json!({
        "block_id": {},
        "block": {
            "header": {
                "chain_id": "test-1",
                "height": height.to_string()
            }
        }
    })
}

/// Responds with a block height that grows by one on every read
pub struct AdvancingHeight {
    height: Arc<AtomicU64>,
}

impl Respond for AdvancingHeight {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let height = self.height.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(200).set_body_json(latest_block_body(height))
    }
}

/// Mount a chain that produces a block per height read, starting at `start`
///
/// Returns the shared height so tests can see how far the chain advanced.
pub async fn mock_advancing_chain(server: &MockServer, start: u64) -> Arc<AtomicU64> {
    let height = Arc::new(AtomicU64::new(start));
    Mock::given(method("GET"))
        .and(path(LATEST_BLOCK_PATH))
        .respond_with(AdvancingHeight {
            height: Arc::clone(&height),
        })
        .mount(server)
        .await;
    height
}

/// Mount a chain stuck at `height`
pub async fn mock_stalled_chain(server: &MockServer, height: u64) {
    Mock::given(method("GET"))
        .and(path(LATEST_BLOCK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(latest_block_body(height)))
        .mount(server)
        .await;
}

pub fn registered_query_body(query_id: u64, remote_height: u64) -> Value {
    json!({
        "registered_query": {
            "id": query_id.to_string(),
            "owner": CONTRACT,
            "query_type": "kv",
            "keys": [{ "path": "bank", "key": "AhRhYmM=" }],
            "transactions_filter": "",
            "connection_id": "connection-0",
            "update_period": "1",
            "last_submitted_result_local_height": "0",
            "last_submitted_result_remote_height": {
                "revision_number": "0",
                "revision_height": remote_height.to_string()
            },
            "deposit": [],
            "submit_timeout": "1036800",
            "registered_at_height": "12"
        }
    })
}

/// Mount a registered query whose remote height is `remote_height` for the
/// first `times` reads
pub async fn mock_registered_query_times(
    server: &MockServer,
    query_id: u64,
    remote_height: u64,
    times: u64,
) {
    Mock::given(method("GET"))
        .and(path(REGISTERED_QUERY_PATH))
        .and(query_param("query_id", query_id.to_string()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(registered_query_body(query_id, remote_height)),
        )
        .up_to_n_times(times)
        .mount(server)
        .await;
}

pub async fn mock_registered_query(server: &MockServer, query_id: u64, remote_height: u64) {
    Mock::given(method("GET"))
        .and(path(REGISTERED_QUERY_PATH))
        .and(query_param("query_id", query_id.to_string()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(registered_query_body(query_id, remote_height)),
        )
        .mount(server)
        .await;
}

/// Request path of a smart query, as the client encodes it
pub fn smart_query_path(contract: &str, msg: &Value) -> String {
    let encoded = STANDARD.encode(serde_json::to_vec(msg).unwrap());
    format!(
        "/cosmwasm/wasm/v1/contract/{}/smart/{}",
        contract,
        encoded.replace('/', "%2F")
    )
}

/// Mount a smart query answering `data` for the first `times` requests
pub async fn mock_smart_query_times(
    server: &MockServer,
    contract: &str,
    msg: &Value,
    data: Value,
    times: u64,
) {
    Mock::given(method("GET"))
        .and(path(smart_query_path(contract, msg)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

pub async fn mock_smart_query(server: &MockServer, contract: &str, msg: &Value, data: Value) {
    Mock::given(method("GET"))
        .and(path(smart_query_path(contract, msg)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

pub fn transfers_number_msg() -> Value {
    json!({ "get_transfers_number": {} })
}

pub fn ack_msg(ica_id: &str, sequence_id: u64) -> Value {
    json!({
        "acknowledgement_result": {
            "interchain_account_id": ica_id,
            "sequence_id": sequence_id
        }
    })
}

pub async fn mock_balance(server: &MockServer, address: &str, denom: &str, amount: u128) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/cosmos/bank/v1beta1/balances/{}/by_denom",
            address
        )))
        .and(query_param("denom", denom))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "balance": { "denom": denom, "amount": amount.to_string() }
        })))
        .mount(server)
        .await;
}

/// Number of requests the server received for `request_path`
pub async fn hits(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}
