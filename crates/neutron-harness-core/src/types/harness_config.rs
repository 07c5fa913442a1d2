//! Harness configuration types
//!
//! These types describe the running testnet the harness talks to (REST
//! endpoints for Neutron and its counterparty chain), how block-paced polling
//! behaves, and how faults are injected into the environment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Attempt budget used when a caller does not pick one
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// Complete harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HarnessConfig {
    /// The Neutron chain under test
    #[serde(default = "default_neutron")]
    pub neutron: ChainEndpoint,

    /// The counterparty chain on the other end of the IBC connection
    #[serde(default = "default_counterparty")]
    pub counterparty: ChainEndpoint,

    /// Poll engine defaults
    #[serde(default)]
    pub polling: PollPolicy,

    /// Block production waiting
    #[serde(default)]
    pub blocks: BlockWaitConfig,

    /// Fault injection
    #[serde(default)]
    pub faults: FaultConfig,

    /// Well-known contract addresses keyed by logical name
    #[serde(default)]
    pub contracts: BTreeMap<String, String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            neutron: default_neutron(),
            counterparty: default_counterparty(),
            polling: PollPolicy::default(),
            blocks: BlockWaitConfig::default(),
            faults: FaultConfig::default(),
            contracts: BTreeMap::new(),
        }
    }
}

fn default_neutron() -> ChainEndpoint {
    ChainEndpoint {
        chain_id: "test-1".to_string(),
        rest_url: "http://127.0.0.1:1317".to_string(),
        denom: "untrn".to_string(),
        request_timeout_secs: default_request_timeout(),
    }
}

fn default_counterparty() -> ChainEndpoint {
    ChainEndpoint {
        chain_id: "test-2".to_string(),
        rest_url: "http://127.0.0.1:1316".to_string(),
        denom: "uatom".to_string(),
        request_timeout_secs: default_request_timeout(),
    }
}

/// A chain's REST (LCD) endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChainEndpoint {
    /// Chain ID as reported by the node
    pub chain_id: String,

    /// Base URL of the Cosmos SDK REST API
    pub rest_url: String,

    /// Native fee denom
    pub denom: String,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ChainEndpoint {
    /// Per-request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_request_timeout() -> u64 {
    30
}

/// Attempt budget and pacing for the poll engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PollPolicy {
    /// Maximum number of fetch attempts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Blocks to wait between two attempts
    #[serde(default = "default_blocks_between_attempts")]
    pub blocks_between_attempts: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            blocks_between_attempts: default_blocks_between_attempts(),
        }
    }
}

impl PollPolicy {
    /// Policy with the given attempt budget and one block between attempts
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_blocks_between_attempts() -> u64 {
    1
}

/// How the harness waits for new blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BlockWaitConfig {
    /// Interval between two latest-height reads, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Give up waiting for blocks after this many seconds
    #[serde(default = "default_block_timeout")]
    pub timeout_secs: u64,
}

impl Default for BlockWaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            timeout_secs: default_block_timeout(),
        }
    }
}

impl BlockWaitConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_poll_interval() -> u64 {
    500
}
fn default_block_timeout() -> u64 {
    120
}

/// Which fault injection backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultBackend {
    /// `docker pause` / `docker unpause`
    Docker,
    /// Reject every fault action
    #[default]
    Disabled,
}

impl std::str::FromStr for FaultBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "docker" => Ok(Self::Docker),
            "disabled" | "none" => Ok(Self::Disabled),
            other => Err(format!("unknown fault backend: {}", other)),
        }
    }
}

/// Fault injection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FaultConfig {
    #[serde(default)]
    pub backend: FaultBackend,

    /// Logical target (`relayer`, `neutron`, ...) to container name
    #[serde(default)]
    pub containers: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_policy_defaults() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 20);
        assert_eq!(policy.blocks_between_attempts, 1);
        assert_eq!(PollPolicy::with_attempts(5).max_attempts, 5);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = r#"
neutron:
  chain-id: "neutron-local"
  rest-url: "http://node:1317"
  denom: "untrn"
polling:
  max-attempts: 50
"#;
        let config: HarnessConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.neutron.chain_id, "neutron-local");
        assert_eq!(config.neutron.request_timeout_secs, 30);
        assert_eq!(config.counterparty.denom, "uatom");
        assert_eq!(config.polling.max_attempts, 50);
        assert_eq!(config.polling.blocks_between_attempts, 1);
        assert_eq!(config.blocks.timeout(), Duration::from_secs(120));
        assert_eq!(config.faults.backend, FaultBackend::Disabled);
    }

    #[test]
    fn test_fault_backend_from_str() {
        assert_eq!("docker".parse::<FaultBackend>(), Ok(FaultBackend::Docker));
        assert_eq!("NONE".parse::<FaultBackend>(), Ok(FaultBackend::Disabled));
        assert!("podman".parse::<FaultBackend>().is_err());
    }
}
