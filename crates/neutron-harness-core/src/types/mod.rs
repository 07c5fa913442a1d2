//! Type definitions shared across the harness crates

mod harness_config;

pub use harness_config::{
    BlockWaitConfig, ChainEndpoint, FaultBackend, FaultConfig, HarnessConfig, PollPolicy,
    DEFAULT_MAX_ATTEMPTS,
};
