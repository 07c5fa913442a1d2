//! Per-attempt diagnostic trail kept by the poll engine

use serde::Serialize;
use std::fmt;

/// What a single non-successful attempt observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum AttemptOutcome {
    /// The fetch itself failed; holds the error message
    FetchFailed(String),
    /// The fetch succeeded but the value was not ready; holds the value as JSON
    NotReady(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// 1-indexed attempt number
    pub attempt: u32,
    pub outcome: AttemptOutcome,
}

/// Every failed attempt of one poll, in order
///
/// Only the most recent fetch error is surfaced as the error message of a
/// failed poll; the history keeps the rest, including not-ready values that
/// were observed between fetch failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttemptHistory {
    records: Vec<AttemptRecord>,
}

impl AttemptHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, attempt: u32, outcome: AttemptOutcome) {
        self.records.push(AttemptRecord { attempt, outcome });
    }

    pub fn records(&self) -> &[AttemptRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttemptRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of attempts whose fetch failed
    pub fn fetch_failures(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, AttemptOutcome::FetchFailed(_)))
            .count()
    }

    /// Number of attempts that fetched a value which was not ready
    pub fn not_ready(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, AttemptOutcome::NotReady(_)))
            .count()
    }

    pub fn last(&self) -> Option<&AttemptRecord> {
        self.records.last()
    }
}

impl fmt::Display for AttemptHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match &record.outcome {
                AttemptOutcome::FetchFailed(err) => {
                    write!(f, "attempt {}: fetch failed: {}", record.attempt, err)?
                }
                AttemptOutcome::NotReady(value) => {
                    write!(f, "attempt {}: not ready: {}", record.attempt, value)?
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_display() {
        let mut history = AttemptHistory::default();
        history.push(1, AttemptOutcome::FetchFailed("connection refused".into()));
        history.push(2, AttemptOutcome::NotReady("{\"height\":3}".into()));

        assert_eq!(history.len(), 2);
        assert_eq!(history.fetch_failures(), 1);
        assert_eq!(history.not_ready(), 1);
        assert_eq!(history.last().map(|r| r.attempt), Some(2));
        assert_eq!(
            history.to_string(),
            "attempt 1: fetch failed: connection refused\nattempt 2: not ready: {\"height\":3}"
        );
    }

    #[test]
    fn test_serializes_as_list() {
        let mut history = AttemptHistory::default();
        history.push(1, AttemptOutcome::NotReady("0".into()));
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"attempt": 1, "outcome": {"kind": "not_ready", "detail": "0"}}])
        );
    }
}
