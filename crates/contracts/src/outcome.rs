//! Outcome / BatchResult - Coordinator and aggregator output

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broker-assigned message identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Result of one publish task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Broker accepted the message
    Published(MessageId),
    /// Serialization or broker failure, with detail
    Failed(String),
}

impl Outcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published(_))
    }
}

/// Outcome tagged with the origin index of its task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedOutcome {
    pub index: usize,
    pub outcome: Outcome,
}

impl IndexedOutcome {
    pub fn published(index: usize, id: impl Into<MessageId>) -> Self {
        Self {
            index,
            outcome: Outcome::Published(id.into()),
        }
    }

    pub fn failed(index: usize, detail: impl Into<String>) -> Self {
        Self {
            index,
            outcome: Outcome::Failed(detail.into()),
        }
    }
}

/// A failed record, reported back to the caller by origin index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRecord {
    pub index: usize,
    pub error: String,
}

/// Aggregate over all outcomes of one request.
///
/// Invariant: `succeeded + failures.len() == total`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// Number of records submitted
    pub total: usize,
    /// Number of records published
    pub succeeded: usize,
    /// Message ids of published records, in origin-index order
    pub message_ids: Vec<MessageId>,
    /// Failed records, in origin-index order
    pub failures: Vec<FailedRecord>,
}

impl BatchResult {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Every record was published (vacuously true for an empty batch)
    pub fn all_published(&self) -> bool {
        self.failures.is_empty()
    }

    /// Some, but not all, records were published
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty() && self.succeeded > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_result_classification() {
        let result = BatchResult {
            total: 2,
            succeeded: 1,
            message_ids: vec!["m-0".into()],
            failures: vec![FailedRecord {
                index: 1,
                error: "boom".to_string(),
            }],
        };
        assert!(result.is_partial());
        assert!(!result.all_published());
        assert_eq!(result.failed(), 1);
    }

    #[test]
    fn test_empty_batch_is_all_published() {
        let result = BatchResult::default();
        assert!(result.all_published());
        assert!(!result.is_partial());
    }
}
