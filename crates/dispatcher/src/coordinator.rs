//! PublishCoordinator - fan-out publish tasks, fan-in their outcomes

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use contracts::{IndexedOutcome, Outcome, PublishTask, Publisher};

use crate::metrics::{MetricsSnapshot, PublishMetrics};

/// Submits every task of a request concurrently and joins all of them.
///
/// Holds the process-wide publisher; cloning the coordinator shares it.
pub struct PublishCoordinator<P> {
    publisher: Arc<P>,
    metrics: Arc<PublishMetrics>,
}

impl<P> Clone for PublishCoordinator<P> {
    fn clone(&self) -> Self {
        Self {
            publisher: Arc::clone(&self.publisher),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<P> PublishCoordinator<P>
where
    P: Publisher + Sync + 'static,
{
    /// Create a coordinator around an initialized publisher
    pub fn new(publisher: P) -> Self {
        Self::from_shared(Arc::new(publisher))
    }

    /// Create a coordinator around an already shared publisher
    pub fn from_shared(publisher: Arc<P>) -> Self {
        Self {
            publisher,
            metrics: Arc::new(PublishMetrics::new()),
        }
    }

    /// Publisher name
    pub fn publisher_name(&self) -> &str {
        self.publisher.name()
    }

    /// Get current metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Publish every task and return one outcome per task.
    ///
    /// All tasks are spawned before any is awaited, then every handle is
    /// joined. A failing or panicking task yields `Outcome::Failed` for its
    /// own index and never affects siblings. Outcomes come back in task
    /// order; completion order is not observable.
    ///
    /// Spawned tasks are detached from the caller: if the request future is
    /// dropped mid-join, already-submitted publishes still run to completion.
    #[instrument(name = "publish_all", skip(self, tasks), fields(tasks = tasks.len()))]
    pub async fn publish_all(&self, tasks: Vec<PublishTask>) -> Vec<IndexedOutcome> {
        // Fan-out
        let handles: Vec<(usize, JoinHandle<Outcome>)> = tasks
            .into_iter()
            .map(|task| {
                let index = task.index;
                let publisher = Arc::clone(&self.publisher);
                let metrics = Arc::clone(&self.metrics);
                (index, tokio::spawn(publish_one(publisher, metrics, task)))
            })
            .collect();

        debug!(submitted = handles.len(), "All publish tasks submitted");

        // Fan-in
        let mut outcomes = Vec::with_capacity(handles.len());
        for (index, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.metrics.inc_failure_count();
                    warn!(index, error = %e, "Publish task did not complete");
                    Outcome::Failed(format!("publish task aborted: {e}"))
                }
            };
            outcomes.push(IndexedOutcome { index, outcome });
        }

        outcomes
    }
}

/// Serialize and publish a single task; never returns an error.
async fn publish_one<P>(publisher: Arc<P>, metrics: Arc<PublishMetrics>, task: PublishTask) -> Outcome
where
    P: Publisher + Sync,
{
    let index = task.index;
    let payload = match task.record.to_bytes() {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            metrics.inc_failure_count();
            observability::record_publish(false, 0.0);
            warn!(index, error = %e, "Record serialization failed");
            return Outcome::Failed(format!("serialization failed: {e}"));
        }
    };

    let preview = payload.clone();
    let started = Instant::now();
    let result = {
        let _in_flight = metrics.track_in_flight();
        publisher.publish(&task.topic, payload).await
    };
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    match result {
        Ok(message_id) => {
            metrics.inc_published_count();
            observability::record_publish(true, latency_ms);
            debug!(index, message_id = %message_id, latency_ms, "Record published");
            Outcome::Published(message_id)
        }
        Err(e) => {
            metrics.inc_failure_count();
            observability::record_publish(false, latency_ms);
            warn!(
                index,
                publisher = publisher.name(),
                error = %e,
                payload = %observability::payload_preview(&preview),
                "Record publish failed"
            );
            Outcome::Failed(e.to_string())
        }
    }
}
