//! # neutron-harness-core
//!
//! Core library for the Neutron integration harness providing:
//! - Harness configuration types and the hierarchical loader
//! - The block-paced poll engine used to observe eventually-consistent
//!   cross-chain state

pub mod config;
pub mod error;
pub mod poll;
pub mod types;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use types::HarnessConfig;
