//! LogPublisher - logs records via tracing instead of publishing

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use contracts::{ContractError, MessageId, Publisher, TopicPath};
use tracing::{info, instrument};

/// Publisher that logs each record and hands out sequential ids.
///
/// Used for local development and the one-shot `ingest` command.
pub struct LogPublisher {
    name: String,
    next_id: AtomicU64,
}

impl LogPublisher {
    /// Create a new LogPublisher with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_id: AtomicU64::new(0),
        }
    }
}

impl Publisher for LogPublisher {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_publisher_publish",
        skip(self, payload),
        fields(publisher = %self.name, bytes = payload.len())
    )]
    async fn publish(&self, topic: &TopicPath, payload: Bytes) -> Result<MessageId, ContractError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let message_id = MessageId::new(format!("log-{id}"));

        info!(
            publisher = %self.name,
            topic = %topic,
            message_id = %message_id,
            record = %String::from_utf8_lossy(&payload),
            "Record published to log"
        );

        Ok(message_id)
    }
}
