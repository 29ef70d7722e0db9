//! Publisher trait - broker capability consumed by the coordinator
//!
//! Defines the abstract interface for broker clients.

use bytes::Bytes;

use crate::{ContractError, MessageId, TopicPath};

/// Broker publish capability
///
/// One instance is created at process start and shared by every request
/// and every concurrent publish task, so implementations take `&self` and
/// must be internally synchronized.
#[trait_variant::make(Publisher: Send)]
pub trait LocalPublisher {
    /// Publisher name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Publish one encoded record to `topic`
    ///
    /// # Errors
    /// Returns `ContractError::Publish` with broker context, or
    /// `ContractError::BrokerUnavailable` when the broker cannot be reached.
    /// Timeouts and retries are the implementation's concern.
    async fn publish(&self, topic: &TopicPath, payload: Bytes) -> Result<MessageId, ContractError>;
}
