//! BrokerPublisher - publisher selected by configuration at startup

use bytes::Bytes;
use contracts::{BrokerConfig, BrokerKind, ContractError, MessageId, Publisher, TopicPath};
use tracing::{info, instrument};

use crate::error::DispatcherError;
use crate::publishers::{LogPublisher, PubSubConfig, PubSubPublisher};

/// Process-wide broker client
pub enum BrokerPublisher {
    PubSub(PubSubPublisher),
    Log(LogPublisher),
}

impl Publisher for BrokerPublisher {
    fn name(&self) -> &str {
        match self {
            Self::PubSub(p) => p.name(),
            Self::Log(p) => p.name(),
        }
    }

    async fn publish(&self, topic: &TopicPath, payload: Bytes) -> Result<MessageId, ContractError> {
        match self {
            Self::PubSub(p) => p.publish(topic, payload).await,
            Self::Log(p) => p.publish(topic, payload).await,
        }
    }
}

/// Create the broker client from configuration
///
/// Called once at process start; the result is shared by all requests.
#[instrument(name = "dispatcher_create_publisher", skip(config), fields(kind = ?config.kind))]
pub fn create_publisher(config: &BrokerConfig) -> Result<BrokerPublisher, DispatcherError> {
    let publisher = match config.kind {
        BrokerKind::Pubsub => {
            BrokerPublisher::PubSub(PubSubPublisher::new("pubsub", PubSubConfig::from_broker(config))?)
        }
        BrokerKind::Log => BrokerPublisher::Log(LogPublisher::new("log")),
    };

    info!(publisher = publisher.name(), "Broker publisher initialized");
    Ok(publisher)
}
