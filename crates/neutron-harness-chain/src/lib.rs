//! # neutron-harness-chain
//!
//! Everything the Neutron integration scenarios need around the poll engine:
//! - `RestChainClient`, a read-only Cosmos SDK REST client that also knows how
//!   to wait for new blocks
//! - block-paced wait helpers for interchain queries, transfers,
//!   acknowledgements and contract callbacks
//! - an injectable fault controller (`docker pause` and friends)
//! - the per-scenario `ScenarioContext`

pub mod client;
pub mod context;
pub mod error;
pub mod fault;
pub mod types;
pub mod wait;

pub use client::RestChainClient;
pub use context::{ContractRegistry, ScenarioContext, ScenarioContextBuilder};
pub use error::{ChainError, ContextError, FaultError, WithPausedError};
pub use fault::{
    controller_for, with_paused, DisabledFaultController, DockerFaultController, FaultAction, FaultController,
    RecordingFaultController,
};
