//! ScenarioContext wiring and teardown

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::*;
use neutron_harness_chain::wait::wait_for_transfers_amount;
use neutron_harness_chain::{
    with_paused, ContextError, FaultAction, FaultController, FaultError,
    RecordingFaultController, ScenarioContext,
};
use neutron_harness_core::types::FaultBackend;
use serde_json::json;
use tokio::sync::Mutex;
use wiremock::MockServer;

#[tokio::test]
async fn test_context_from_config() {
    let server = MockServer::start().await;
    let mut config = config(&server);
    config
        .contracts
        .insert("ibc_transfer".to_string(), CONTRACT.to_string());

    let ctx = ScenarioContext::from_config(config).unwrap();

    assert_eq!(ctx.neutron().chain_id(), "test-1");
    assert_eq!(ctx.counterparty().chain_id(), "test-2");
    assert_eq!(ctx.faults().name(), "disabled");
    assert_eq!(ctx.contract("ibc_transfer").unwrap(), CONTRACT);
    assert!(matches!(
        ctx.contract("interchain_queries"),
        Err(ContextError::UnknownContract(name)) if name == "interchain_queries"
    ));
}

#[tokio::test]
async fn test_context_picks_docker_backend() {
    let server = MockServer::start().await;
    let mut config = config(&server);
    config.faults.backend = FaultBackend::Docker;

    let ctx = ScenarioContext::from_config(config).unwrap();
    assert_eq!(ctx.faults().name(), "docker");
}

#[tokio::test]
async fn test_context_rejects_bad_rest_url() {
    let server = MockServer::start().await;
    let mut config = config(&server);
    config.counterparty.rest_url = "not a url".to_string();

    let err = ScenarioContext::from_config(config).err().unwrap();
    assert!(matches!(err, ContextError::Chain(_)));
}

#[tokio::test]
async fn test_register_contract_then_wait() {
    let server = MockServer::start().await;
    mock_advancing_chain(&server, 1).await;
    mock_smart_query(
        &server,
        "neutron1fresh",
        &transfers_number_msg(),
        json!({ "transfers_number": 1 }),
    )
    .await;

    let mut ctx = ScenarioContext::from_config(config(&server)).unwrap();
    ctx.register_contract("ibc_transfer", "neutron1fresh");

    let contract = ctx.contract("ibc_transfer").unwrap();
    let transfers = wait_for_transfers_amount(ctx.neutron(), contract, 1, 3)
        .await
        .unwrap();
    assert_eq!(transfers, 1);
}

#[tokio::test]
async fn test_context_poller_uses_configured_policy() {
    let server = MockServer::start().await;
    mock_advancing_chain(&server, 1).await;
    let mut config = config(&server);
    config.polling.max_attempts = 2;
    config.polling.blocks_between_attempts = 3;

    let ctx = ScenarioContext::from_config(config).unwrap();
    let poller = ctx.poller("height parity");
    assert_eq!(poller.policy().max_attempts, 2);
    assert_eq!(poller.policy().blocks_between_attempts, 3);

    let err = poller
        .poll(|| ctx.neutron().latest_height(), |_height: &u64| false)
        .await
        .unwrap_err();
    assert!(err.is_exhausted());
    assert_eq!(err.attempts(), 2);
}

#[tokio::test]
async fn test_teardown_unpauses_everything() {
    let server = MockServer::start().await;
    let faults = Arc::new(RecordingFaultController::new());
    let ctx = ScenarioContext::builder(config(&server))
        .with_fault_controller(faults.clone())
        .build()
        .unwrap();

    ctx.faults().pause("relayer").await.unwrap();
    ctx.faults().pause("counterparty").await.unwrap();
    with_paused(ctx.faults(), "neutron", async {}).await.unwrap();

    ctx.teardown().await.unwrap();

    assert!(faults.paused().await.is_empty());
    let unpaused: Vec<String> = faults
        .actions()
        .await
        .into_iter()
        .filter(|(action, _)| *action == FaultAction::Unpause)
        .map(|(_, target)| target)
        .collect();
    assert_eq!(unpaused, vec!["neutron", "counterparty", "relayer"]);
}

/// Controller whose unpause fails for one target
struct StuckController {
    paused: Mutex<Vec<String>>,
    stuck: &'static str,
}

#[async_trait]
impl FaultController for StuckController {
    fn name(&self) -> &'static str {
        "stuck"
    }

    async fn pause(&self, target: &str) -> Result<(), FaultError> {
        self.paused.lock().await.push(target.to_string());
        Ok(())
    }

    async fn unpause(&self, target: &str) -> Result<(), FaultError> {
        if target == self.stuck {
            return Err(FaultError::UnknownTarget(target.to_string()));
        }
        self.paused.lock().await.retain(|paused| paused != target);
        Ok(())
    }

    async fn paused(&self) -> Vec<String> {
        self.paused.lock().await.clone()
    }
}

#[tokio::test]
async fn test_teardown_reports_first_failure_but_tries_all() {
    let server = MockServer::start().await;
    let faults = Arc::new(StuckController {
        paused: Mutex::new(Vec::new()),
        stuck: "relayer",
    });
    let ctx = ScenarioContext::builder(config(&server))
        .with_fault_controller(faults.clone())
        .build()
        .unwrap();

    ctx.faults().pause("relayer").await.unwrap();
    ctx.faults().pause("neutron").await.unwrap();

    let err = ctx.teardown().await.unwrap_err();
    assert!(matches!(err, ContextError::Fault(FaultError::UnknownTarget(t)) if t == "relayer"));
    assert_eq!(faults.paused().await, vec!["relayer".to_string()]);
}
