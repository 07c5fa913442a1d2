//! Poll observation and logging
//!
//! This module provides the `PollObserver` trait for monitoring poll attempts
//! and a `TracingObserver` implementation that logs using the `tracing` crate.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Observer trait for poll attempt events
pub trait PollObserver: Send + Sync {
    /// Called when an attempt is about to fetch
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32);

    /// Called when a fetch failed; the error is kept and polling continues
    fn on_fetch_failed(&self, attempt: u32, error: &dyn fmt::Display);

    /// Called when a fetched value did not satisfy the readiness predicate
    ///
    /// `value` is the JSON rendering of the fetched value.
    fn on_not_ready(&self, attempt: u32, value: &str);

    /// Called before waiting for `blocks` new blocks
    fn on_advance(&self, attempt: u32, blocks: u64);

    /// Called when a ready value is returned
    fn on_success(&self, attempt: u32, elapsed: Duration);

    /// Called when the budget ran out without a ready value
    fn on_exhausted(&self, attempts: u32, error: &dyn fmt::Display);
}

/// A no-op observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl PollObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    fn on_fetch_failed(&self, _attempt: u32, _error: &dyn fmt::Display) {}

    fn on_not_ready(&self, _attempt: u32, _value: &str) {}

    fn on_advance(&self, _attempt: u32, _blocks: u64) {}

    fn on_success(&self, _attempt: u32, _elapsed: Duration) {}

    fn on_exhausted(&self, _attempts: u32, _error: &dyn fmt::Display) {}
}

/// An observer that logs poll events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`, `on_advance`: TRACE
/// - `on_fetch_failed`, `on_not_ready`: DEBUG
/// - `on_success`: INFO (if > 1 attempt) or DEBUG (first attempt)
/// - `on_exhausted`: WARN
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the observed state (for log context)
    target: String,
}

impl TracingObserver {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("poll")
    }
}

impl PollObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        tracing::trace!(
            target_state = %self.target,
            attempt = attempt,
            max_attempts = max_attempts,
            "fetching"
        );
    }

    fn on_fetch_failed(&self, attempt: u32, error: &dyn fmt::Display) {
        tracing::debug!(
            target_state = %self.target,
            attempt = attempt,
            error = %error,
            "fetch failed, will retry"
        );
    }

    fn on_not_ready(&self, attempt: u32, value: &str) {
        tracing::debug!(
            target_state = %self.target,
            attempt = attempt,
            value = value,
            "value not ready yet"
        );
    }

    fn on_advance(&self, attempt: u32, blocks: u64) {
        tracing::trace!(
            target_state = %self.target,
            attempt = attempt,
            blocks = blocks,
            "waiting for blocks"
        );
    }

    fn on_success(&self, attempt: u32, elapsed: Duration) {
        if attempt > 1 {
            tracing::info!(
                target_state = %self.target,
                attempt = attempt,
                elapsed_ms = elapsed.as_millis() as u64,
                "ready after polling"
            );
        } else {
            tracing::debug!(
                target_state = %self.target,
                elapsed_ms = elapsed.as_millis() as u64,
                "ready on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempts: u32, error: &dyn fmt::Display) {
        tracing::warn!(
            target_state = %self.target,
            attempts = attempts,
            error = %error,
            "no attempts left"
        );
    }
}

/// An observer that counts poll events
///
/// Useful for tests that assert how many fetches and advances happened.
#[derive(Debug, Default)]
pub struct StatsObserver {
    pub attempt_starts: AtomicU32,
    pub fetch_failures: AtomicU32,
    pub not_ready: AtomicU32,
    pub advances: AtomicU32,
    pub successes: AtomicU32,
    pub exhaustions: AtomicU32,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    pub fn fetch_failures(&self) -> u32 {
        self.fetch_failures.load(Ordering::SeqCst)
    }

    pub fn not_ready(&self) -> u32 {
        self.not_ready.load(Ordering::SeqCst)
    }

    pub fn advances(&self) -> u32 {
        self.advances.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }
}

impl PollObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_fetch_failed(&self, _attempt: u32, _error: &dyn fmt::Display) {
        self.fetch_failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_not_ready(&self, _attempt: u32, _value: &str) {
        self.not_ready.fetch_add(1, Ordering::SeqCst);
    }

    fn on_advance(&self, _attempt: u32, _blocks: u64) {
        self.advances.fetch_add(1, Ordering::SeqCst);
    }

    fn on_success(&self, _attempt: u32, _elapsed: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32, _error: &dyn fmt::Display) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: PollObserver + ?Sized> PollObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_fetch_failed(&self, attempt: u32, error: &dyn fmt::Display) {
        (**self).on_fetch_failed(attempt, error)
    }

    fn on_not_ready(&self, attempt: u32, value: &str) {
        (**self).on_not_ready(attempt, value)
    }

    fn on_advance(&self, attempt: u32, blocks: u64) {
        (**self).on_advance(attempt, blocks)
    }

    fn on_success(&self, attempt: u32, elapsed: Duration) {
        (**self).on_success(attempt, elapsed)
    }

    fn on_exhausted(&self, attempts: u32, error: &dyn fmt::Display) {
        (**self).on_exhausted(attempts, error)
    }
}

impl<T: PollObserver + ?Sized> PollObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_fetch_failed(&self, attempt: u32, error: &dyn fmt::Display) {
        (**self).on_fetch_failed(attempt, error)
    }

    fn on_not_ready(&self, attempt: u32, value: &str) {
        (**self).on_not_ready(attempt, value)
    }

    fn on_advance(&self, attempt: u32, blocks: u64) {
        (**self).on_advance(attempt, blocks)
    }

    fn on_success(&self, attempt: u32, elapsed: Duration) {
        (**self).on_success(attempt, elapsed)
    }

    fn on_exhausted(&self, attempts: u32, error: &dyn fmt::Display) {
        (**self).on_exhausted(attempts, error)
    }
}
