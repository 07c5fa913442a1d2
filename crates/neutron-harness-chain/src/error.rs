//! Error types for neutron-harness-chain

use std::fmt;

use thiserror::Error;

/// Errors talking to a chain's REST API
#[derive(Error, Debug)]
pub enum ChainError {
    /// Transport-level failure (connection refused, timeout, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a non-2xx status
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A query message could not be serialized
    #[error("failed to encode query message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid REST URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The chain did not reach the target height in time
    #[error(
        "chain did not reach height {target} within {timeout_secs}s (started at {start}, last seen {current})"
    )]
    BlockTimeout {
        start: u64,
        target: u64,
        current: u64,
        timeout_secs: u64,
    },
}

impl ChainError {
    /// Whether the node answered with `404 Not Found`
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChainError::Status { status: 404, .. })
    }
}

/// Errors from the fault controller
#[derive(Error, Debug)]
pub enum FaultError {
    #[error("fault injection is disabled")]
    Disabled,

    #[error("unknown fault target: {0}")]
    UnknownTarget(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} {action} {container} failed: {stderr}")]
    Command {
        program: String,
        action: String,
        container: String,
        stderr: String,
    },
}

/// Failure of `with_paused`
///
/// When only the unpause fails, the output of the paused run is kept, since it
/// often holds the scenario's own result.
#[derive(Debug)]
pub enum WithPausedError<T> {
    /// The target could not be paused; the run never started
    Pause(FaultError),
    /// The run finished but the target could not be unpaused
    Unpause { output: T, source: FaultError },
}

impl<T> WithPausedError<T> {
    pub fn fault(&self) -> &FaultError {
        match self {
            WithPausedError::Pause(source) | WithPausedError::Unpause { source, .. } => source,
        }
    }

    /// Output of the paused run, if it ran
    pub fn into_output(self) -> Option<T> {
        match self {
            WithPausedError::Pause(_) => None,
            WithPausedError::Unpause { output, .. } => Some(output),
        }
    }
}

impl<T> fmt::Display for WithPausedError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithPausedError::Pause(source) => write!(f, "failed to pause: {}", source),
            WithPausedError::Unpause { source, .. } => {
                write!(f, "paused run finished but unpause failed: {}", source)
            }
        }
    }
}

impl<T: fmt::Debug> std::error::Error for WithPausedError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.fault())
    }
}

impl<T> From<WithPausedError<T>> for FaultError {
    fn from(err: WithPausedError<T>) -> Self {
        match err {
            WithPausedError::Pause(source) | WithPausedError::Unpause { source, .. } => source,
        }
    }
}

/// Errors building or tearing down a scenario context
#[derive(Error, Debug)]
pub enum ContextError {
    #[error("unknown contract: {0}")]
    UnknownContract(String),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Fault(#[from] FaultError),
}
