//! Gateway - decode, disaggregate, publish, aggregate

use std::time::Instant;

use contracts::{ContractError, DecodedPayload, PublishPolicy, Publisher, TopicPath};
use dispatcher::{MetricsSnapshot, PublishCoordinator};
use tracing::{error, info, instrument, warn};

use crate::aggregator::aggregate;
use crate::reply::{IngestReply, ReplyOutcome};

/// One request in, one reply out.
///
/// Every path through [`Gateway::ingest`] ends in an `IngestReply`;
/// faults outside decode and publish become a generic 500.
pub struct Gateway<P> {
    coordinator: PublishCoordinator<P>,
    topic: TopicPath,
    policy: PublishPolicy,
}

impl<P> Gateway<P>
where
    P: Publisher + Sync + 'static,
{
    pub fn new(coordinator: PublishCoordinator<P>, topic: TopicPath, policy: PublishPolicy) -> Self {
        Self {
            coordinator,
            topic,
            policy,
        }
    }

    pub fn topic(&self) -> &TopicPath {
        &self.topic
    }

    pub fn policy(&self) -> PublishPolicy {
        self.policy
    }

    pub fn publisher_name(&self) -> &str {
        self.coordinator.publisher_name()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.coordinator.metrics()
    }

    /// Handle one raw request body
    #[instrument(name = "ingest", skip(self, raw), fields(bytes = raw.len()))]
    pub async fn ingest(&self, raw: &[u8]) -> IngestReply {
        let started = Instant::now();

        let reply = match self.process(raw).await {
            Ok(reply) => reply,
            Err(e) if e.is_client_error() => {
                warn!(
                    error = %e,
                    payload = %observability::payload_preview(raw),
                    "Rejected request body"
                );
                IngestReply::rejected(&e)
            }
            Err(e) => {
                error!(error = %e, "Unexpected failure while processing request");
                IngestReply::internal()
            }
        };

        observability::record_request(reply.outcome.as_str());
        observability::record_request_latency_ms(started.elapsed().as_secs_f64() * 1000.0);
        reply
    }

    async fn process(&self, raw: &[u8]) -> Result<IngestReply, ContractError> {
        let payload = ingestion::decode(raw)?;
        if matches!(payload, DecodedPayload::Handshake) {
            info!("Handshake request received, responding OK");
            return Ok(IngestReply::handshake());
        }

        let kind = payload.kind();
        let tasks = ingestion::disaggregate(payload, &self.topic)?;
        let total = tasks.len();
        info!(kind, batch_size = total, topic = %self.topic, "Records received, publishing");
        observability::record_batch_size(total);

        let outcomes = self.coordinator.publish_all(tasks).await;
        let result = aggregate(total, outcomes)?;
        let reply = IngestReply::from_batch(&result, self.policy);

        match reply.outcome {
            ReplyOutcome::Published => {
                info!(total, published = result.succeeded, "All records published")
            }
            _ => warn!(
                total,
                published = result.succeeded,
                failed = result.failed(),
                policy = ?self.policy,
                status = reply.status,
                "Some records failed to publish"
            ),
        }

        Ok(reply)
    }
}
