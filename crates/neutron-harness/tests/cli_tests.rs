//! End-to-end tests for the neutron-harness binary
//!
//! Each test points the CLI at a wiremock server through a temporary
//! harness.yaml and checks exit status and output.

use std::process::Output;

use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LATEST_BLOCK_PATH: &str = "/cosmos/base/tendermint/v1beta1/blocks/latest";
const REGISTERED_QUERY_PATH: &str = "/neutron/interchainqueries/registered_query";

/// Write a config that points both chains at `server` with fast block pacing
fn write_config(server: &MockServer) -> TempDir {
    let dir = TempDir::new().unwrap();
    let config = format!(
        "neutron:\n  rest-url: \"{uri}\"\ncounterparty:\n  rest-url: \"{uri}\"\nblocks:\n  poll-interval-ms: 5\n  timeout-secs: 2\n",
        uri = server.uri()
    );
    std::fs::write(dir.path().join("harness.yaml"), config).unwrap();
    dir
}

async fn run(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_neutron-harness"))
        .arg("-c")
        .arg(dir.path().join("harness.yaml"))
        .args(args)
        .env_remove("HARNESS_NEUTRON_REST_URL")
        .env_remove("HARNESS_MAX_ATTEMPTS")
        .output()
        .await
        .unwrap()
}

async fn mock_height(server: &MockServer, height: u64) {
    Mock::given(method("GET"))
        .and(path(LATEST_BLOCK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "block": { "header": { "chain_id": "test-1", "height": height.to_string() } }
        })))
        .mount(server)
        .await;
}

async fn mock_query(server: &MockServer, query_id: u64, remote_height: u64) {
    Mock::given(method("GET"))
        .and(path(REGISTERED_QUERY_PATH))
        .and(query_param("query_id", query_id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "registered_query": {
                "id": query_id.to_string(),
                "owner": "neutron1owner",
                "query_type": "kv",
                "connection_id": "connection-0",
                "update_period": "1",
                "last_submitted_result_remote_height": {
                    "revision_number": "0",
                    "revision_height": remote_height.to_string()
                }
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_height_json() {
    let server = MockServer::start().await;
    mock_height(&server, 77).await;
    let dir = write_config(&server);

    let output = run(&dir, &["-q", "height", "--json"]).await;

    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["height"], 77);
    assert_eq!(body["chain_id"], "test-1");
}

#[tokio::test]
async fn test_wait_query_ready() {
    let server = MockServer::start().await;
    mock_height(&server, 10).await;
    mock_query(&server, 4, 150).await;
    let dir = write_config(&server);

    let output = run(&dir, &["-q", "wait-query", "4", "--height", "120", "--json"]).await;

    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["id"], "4");
}

#[tokio::test]
async fn test_wait_query_exhaustion_exits_non_zero_with_history() {
    let server = MockServer::start().await;
    // Height grows by one per read so every block wait finishes
    for height in 1..=20u64 {
        Mock::given(method("GET"))
            .and(path(LATEST_BLOCK_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "block": { "header": { "height": height.to_string() } }
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
    }
    mock_query(&server, 4, 0).await;
    let dir = write_config(&server);

    let output = run(&dir, &["-q", "wait-query", "4", "--height", "120", "-n", "2"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("attempt 1: not ready"), "{stderr}");
    assert!(stderr.contains("attempt 2: not ready"), "{stderr}");
    assert!(
        stderr.contains("Gave up waiting for interchain query 4 at remote height 120"),
        "{stderr}"
    );
    assert!(stderr.contains("no attempts left after 2 attempts"), "{stderr}");
}

#[tokio::test]
async fn test_zero_attempts_flag_is_usage_error() {
    let server = MockServer::start().await;
    let dir = write_config(&server);

    let output = run(&dir, &["wait-query", "4", "--height", "120", "-n", "0"]).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_config_show_merges_partial_file() {
    let server = MockServer::start().await;
    let dir = write_config(&server);

    let output = run(&dir, &["config", "show", "--json"]).await;

    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["neutron"]["rest-url"], server.uri());
    assert_eq!(body["neutron"]["chain-id"], "test-1");
    assert_eq!(body["polling"]["max-attempts"], 20);
}
