//! Error types for the poll engine

use std::error::Error;
use std::fmt;

use super::history::AttemptHistory;

/// Errors that end a poll without a ready value
///
/// The error type is generic over `E`, the error type of the fetch
/// operation. Failures of the block waiter are converted into `E` as well.
#[derive(Debug)]
pub enum PollError<E> {
    /// The budget ran out and at least one fetch failed along the way
    ///
    /// `source` is the most recently caught fetch error, even when later
    /// attempts fetched a value that was merely not ready. Its message is the
    /// message of this error.
    Fetch {
        attempts: u32,
        source: E,
        history: AttemptHistory,
    },

    /// The budget ran out, every fetch succeeded, and no value was ready
    Exhausted {
        attempts: u32,
        /// JSON rendering of the last fetched value
        last_value: Option<String>,
        history: AttemptHistory,
    },

    /// Waiting for the next block failed, which stops polling immediately
    Advance { attempt: u32, source: E },
}

impl<E: fmt::Display> fmt::Display for PollError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollError::Fetch { source, .. } => write!(f, "{}", source),
            PollError::Exhausted {
                attempts,
                last_value,
                ..
            } => write!(
                f,
                "no attempts left after {} attempts, latest fetch response: {}",
                attempts,
                last_value.as_deref().unwrap_or("none")
            ),
            PollError::Advance { attempt, source } => {
                write!(f, "waiting for next block after attempt {} failed: {}", attempt, source)
            }
        }
    }
}

impl<E: Error + 'static> Error for PollError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            // Display already forwards the fetch error's message
            PollError::Fetch { source, .. } => source.source(),
            PollError::Advance { source, .. } => Some(source),
            PollError::Exhausted { .. } => None,
        }
    }
}

impl<E> PollError<E> {
    pub fn fetch(attempts: u32, source: E, history: AttemptHistory) -> Self {
        PollError::Fetch {
            attempts,
            source,
            history,
        }
    }

    pub fn exhausted(attempts: u32, last_value: Option<String>, history: AttemptHistory) -> Self {
        PollError::Exhausted {
            attempts,
            last_value,
            history,
        }
    }

    pub fn advance(attempt: u32, source: E) -> Self {
        PollError::Advance { attempt, source }
    }

    /// Number of fetch attempts made
    pub fn attempts(&self) -> u32 {
        match self {
            PollError::Fetch { attempts, .. } => *attempts,
            PollError::Exhausted { attempts, .. } => *attempts,
            PollError::Advance { attempt, .. } => *attempt,
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, PollError::Fetch { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, PollError::Exhausted { .. })
    }

    pub fn is_advance(&self) -> bool {
        matches!(self, PollError::Advance { .. })
    }

    /// Attempt history, if the budget ran out
    pub fn history(&self) -> Option<&AttemptHistory> {
        match self {
            PollError::Fetch { history, .. } | PollError::Exhausted { history, .. } => {
                Some(history)
            }
            PollError::Advance { .. } => None,
        }
    }

    pub fn last_value(&self) -> Option<&str> {
        match self {
            PollError::Exhausted { last_value, .. } => last_value.as_deref(),
            _ => None,
        }
    }

    /// Get the underlying error, consuming this error
    pub fn into_source(self) -> Option<E> {
        match self {
            PollError::Fetch { source, .. } | PollError::Advance { source, .. } => Some(source),
            PollError::Exhausted { .. } => None,
        }
    }

    /// Map the error type using a closure
    pub fn map_err<F, E2>(self, f: F) -> PollError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            PollError::Fetch {
                attempts,
                source,
                history,
            } => PollError::Fetch {
                attempts,
                source: f(source),
                history,
            },
            PollError::Exhausted {
                attempts,
                last_value,
                history,
            } => PollError::Exhausted {
                attempts,
                last_value,
                history,
            },
            PollError::Advance { attempt, source } => PollError::Advance {
                attempt,
                source: f(source),
            },
        }
    }
}
