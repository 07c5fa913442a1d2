//! Block-paced poll engine
//!
//! Cross-chain state (relayed packets, interchain query results, contract
//! callbacks) only becomes correct after the chain has produced more blocks.
//! This module polls such state with a fixed attempt budget: fetch, test
//! readiness, and on failure wait for the next block before fetching again.
//!
//! # Example
//!
//! ```rust,no_run
//! use neutron_harness_core::poll::{poll_with_attempts, BlockWaiter, PollError};
//!
//! async fn example<W>(chain: &W) -> Result<u64, PollError<W::Error>>
//! where
//!     W: BlockWaiter,
//!     W::Error: std::fmt::Display,
//! {
//!     poll_with_attempts(
//!         chain,
//!         || async { Ok::<u64, W::Error>(42) },
//!         |height| *height >= 42,
//!         20,
//!     )
//!     .await
//! }
//! ```

mod error;
mod executor;
mod history;
mod observer;
mod waiter;

pub use error::PollError;
pub use executor::{poll_with_attempts, Poller, PollerBuilder};
pub use history::{AttemptHistory, AttemptOutcome, AttemptRecord};
pub use observer::{NoOpObserver, PollObserver, StatsObserver, TracingObserver};
pub use waiter::BlockWaiter;
