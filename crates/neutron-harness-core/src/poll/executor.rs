//! Poll execution engine
//!
//! One poll is a sequential loop: fetch, test readiness, and if the value is
//! missing or not ready yet, wait for the next block before the next attempt.
//! A poll never runs fetches concurrently, but any number of polls may share
//! one `BlockWaiter`.

use std::fmt;
use std::future::Future;
use std::time::Instant;

use serde::Serialize;

use crate::types::PollPolicy;

use super::error::PollError;
use super::history::{AttemptHistory, AttemptOutcome};
use super::observer::{NoOpObserver, PollObserver};
use super::waiter::BlockWaiter;

/// Poll `fetch` until `is_ready` accepts a value, waiting one block between
/// attempts
///
/// Performs at most `max_attempts` fetches and `max_attempts - 1` block
/// waits. A failed fetch does not stop polling; if the budget runs out the
/// most recent fetch error is returned, otherwise an exhaustion error carrying
/// the last fetched value as JSON.
pub async fn poll_with_attempts<W, F, Fut, T, E, P>(
    waiter: &W,
    fetch: F,
    is_ready: P,
    max_attempts: u32,
) -> Result<T, PollError<E>>
where
    W: BlockWaiter + ?Sized,
    W::Error: Into<E>,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&T) -> bool,
    T: Serialize,
    E: fmt::Display,
{
    Poller::new(waiter)
        .with_max_attempts(max_attempts)
        .poll(fetch, is_ready)
        .await
}

/// Builder for configuring a `Poller`
///
/// # Example
///
/// ```rust,ignore
/// use neutron_harness_core::poll::{PollerBuilder, TracingObserver};
///
/// let poller = PollerBuilder::new(&chain)
///     .with_max_attempts(30)
///     .with_observer(TracingObserver::new("transfers"))
///     .build();
/// ```
pub struct PollerBuilder<'w, W: ?Sized, O = NoOpObserver> {
    waiter: &'w W,
    policy: PollPolicy,
    observer: O,
}

impl<'w, W: ?Sized> PollerBuilder<'w, W, NoOpObserver> {
    pub fn new(waiter: &'w W) -> Self {
        Self {
            waiter,
            policy: PollPolicy::default(),
            observer: NoOpObserver,
        }
    }
}

impl<'w, W: ?Sized, O> PollerBuilder<'w, W, O> {
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.policy.max_attempts = max_attempts;
        self
    }

    pub fn with_observer<O2>(self, observer: O2) -> PollerBuilder<'w, W, O2> {
        PollerBuilder {
            waiter: self.waiter,
            policy: self.policy,
            observer,
        }
    }

    pub fn build(self) -> Poller<'w, W, O> {
        Poller {
            waiter: self.waiter,
            policy: self.policy,
            observer: self.observer,
        }
    }
}

/// A block-paced poller bound to one `BlockWaiter`
pub struct Poller<'w, W: ?Sized, O = NoOpObserver> {
    waiter: &'w W,
    policy: PollPolicy,
    observer: O,
}

impl<'w, W: ?Sized> Poller<'w, W, NoOpObserver> {
    /// Poller with the default policy (20 attempts, one block between them)
    pub fn new(waiter: &'w W) -> Self {
        PollerBuilder::new(waiter).build()
    }
}

impl<'w, W: ?Sized, O> Poller<'w, W, O> {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.policy.max_attempts = max_attempts;
        self
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }
}

impl<'w, W, O> Poller<'w, W, O>
where
    W: BlockWaiter + ?Sized,
    O: PollObserver,
{
    /// Poll `fetch` until `is_ready` accepts a value
    pub async fn poll<F, Fut, T, E, P>(&self, mut fetch: F, is_ready: P) -> Result<T, PollError<E>>
    where
        W::Error: Into<E>,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&T) -> bool,
        T: Serialize,
        E: fmt::Display,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts;
        let mut history = AttemptHistory::with_capacity(max_attempts as usize);
        let mut last_error: Option<E> = None;
        let mut last_value: Option<String> = None;

        for attempt in 1..=max_attempts {
            self.observer.on_attempt_start(attempt, max_attempts);

            match fetch().await {
                Ok(value) => {
                    if is_ready(&value) {
                        self.observer.on_success(attempt, start.elapsed());
                        return Ok(value);
                    }
                    let rendered = render(&value);
                    self.observer.on_not_ready(attempt, &rendered);
                    history.push(attempt, AttemptOutcome::NotReady(rendered.clone()));
                    last_value = Some(rendered);
                }
                Err(err) => {
                    self.observer.on_fetch_failed(attempt, &err);
                    history.push(attempt, AttemptOutcome::FetchFailed(err.to_string()));
                    last_error = Some(err);
                }
            }

            // No block wait after the final attempt
            if attempt < max_attempts {
                let blocks = self.policy.blocks_between_attempts;
                self.observer.on_advance(attempt, blocks);
                if let Err(err) = self.waiter.wait_blocks(blocks).await {
                    return Err(PollError::advance(attempt, err.into()));
                }
            }
        }

        let err = match last_error {
            Some(source) => PollError::fetch(max_attempts, source, history),
            None => PollError::exhausted(max_attempts, last_value, history),
        };
        self.observer.on_exhausted(max_attempts, &err);
        Err(err)
    }

    /// Poll until `fetch` yields `Some`, returning the inner value
    pub async fn poll_until_some<F, Fut, T, E>(&self, fetch: F) -> Result<T, PollError<E>>
    where
        W::Error: Into<E>,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
        T: Serialize,
        E: fmt::Display,
    {
        match self.poll(fetch, Option::is_some).await? {
            Some(value) => Ok(value),
            None => unreachable!("readiness predicate only accepts Some"),
        }
    }
}

fn render<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}
