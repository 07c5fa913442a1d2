//! Per-scenario context
//!
//! A `ScenarioContext` is built once per scenario from a `HarnessConfig` and
//! passed explicitly to every step. It owns the chain clients, the fault
//! controller and the names of the contracts the scenario deployed.

use std::collections::BTreeMap;
use std::sync::Arc;

use neutron_harness_core::poll::{Poller, PollerBuilder, TracingObserver};
use neutron_harness_core::HarnessConfig;
use tracing::{debug, warn};

use crate::client::RestChainClient;
use crate::error::{ContextError, FaultError};
use crate::fault::{controller_for, FaultController};

/// Logical contract names mapped to on-chain addresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractRegistry {
    contracts: BTreeMap<String, String>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.contracts.get(name).map(String::as_str)
    }

    /// Register `address` under `name`, returning the previous address if any
    pub fn insert(&mut self, name: impl Into<String>, address: impl Into<String>) -> Option<String> {
        self.contracts.insert(name.into(), address.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.contracts
            .iter()
            .map(|(name, address)| (name.as_str(), address.as_str()))
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl From<BTreeMap<String, String>> for ContractRegistry {
    fn from(contracts: BTreeMap<String, String>) -> Self {
        Self { contracts }
    }
}

/// Everything a scenario step needs, passed explicitly
pub struct ScenarioContext {
    config: HarnessConfig,
    neutron: RestChainClient,
    counterparty: RestChainClient,
    faults: Arc<dyn FaultController>,
    contracts: ContractRegistry,
}

impl ScenarioContext {
    /// Context with the fault controller selected by `config.faults`
    pub fn from_config(config: HarnessConfig) -> Result<Self, ContextError> {
        Self::builder(config).build()
    }

    pub fn builder(config: HarnessConfig) -> ScenarioContextBuilder {
        ScenarioContextBuilder {
            config,
            faults: None,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn neutron(&self) -> &RestChainClient {
        &self.neutron
    }

    pub fn counterparty(&self) -> &RestChainClient {
        &self.counterparty
    }

    pub fn faults(&self) -> &dyn FaultController {
        self.faults.as_ref()
    }

    pub fn contracts(&self) -> &ContractRegistry {
        &self.contracts
    }

    /// Address of the contract registered as `name`
    pub fn contract(&self, name: &str) -> Result<&str, ContextError> {
        self.contracts
            .get(name)
            .ok_or_else(|| ContextError::UnknownContract(name.to_string()))
    }

    pub fn register_contract(&mut self, name: impl Into<String>, address: impl Into<String>) {
        let name = name.into();
        let address = address.into();
        debug!(contract = %name, %address, "registering contract");
        self.contracts.insert(name, address);
    }

    /// Neutron-paced poller using the configured attempt budget
    pub fn poller(&self, what: impl Into<String>) -> Poller<'_, RestChainClient, TracingObserver> {
        PollerBuilder::new(&self.neutron)
            .with_policy(self.config.polling)
            .with_observer(TracingObserver::new(what))
            .build()
    }

    /// Unpause every target the scenario left paused
    ///
    /// All targets are attempted; the first failure is returned.
    pub async fn teardown(self) -> Result<(), ContextError> {
        let mut first_error: Option<FaultError> = None;

        for target in self.faults.paused().await {
            if let Err(err) = self.faults.unpause(&target).await {
                warn!(target_name = %target, error = %err, "failed to unpause during teardown");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

/// Builder for `ScenarioContext`
pub struct ScenarioContextBuilder {
    config: HarnessConfig,
    faults: Option<Arc<dyn FaultController>>,
}

impl ScenarioContextBuilder {
    /// Override the fault controller chosen from the config
    pub fn with_fault_controller(mut self, faults: Arc<dyn FaultController>) -> Self {
        self.faults = Some(faults);
        self
    }

    pub fn build(self) -> Result<ScenarioContext, ContextError> {
        let config = self.config;
        let neutron = RestChainClient::new(&config.neutron, config.blocks)?;
        let counterparty = RestChainClient::new(&config.counterparty, config.blocks)?;
        let faults = self
            .faults
            .unwrap_or_else(|| controller_for(&config.faults));
        let contracts = ContractRegistry::from(config.contracts.clone());

        debug!(
            neutron = %config.neutron.chain_id,
            counterparty = %config.counterparty.chain_id,
            faults = faults.name(),
            contracts = contracts.len(),
            "scenario context ready"
        );

        Ok(ScenarioContext {
            config,
            neutron,
            counterparty,
            faults,
            contracts,
        })
    }
}
