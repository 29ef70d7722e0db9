//! MockPublisher - call-counting broker stub for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use contracts::{ContractError, MessageId, Publisher, TopicPath};

type PayloadPredicate = Arc<dyn Fn(&[u8]) -> bool + Send + Sync>;

/// Broker stub.
///
/// Clones share call counters and recorded payloads, so a test can keep one
/// clone for assertions and hand another to the coordinator.
///
/// ```
/// use dispatcher::MockPublisher;
///
/// let publisher = MockPublisher::new().fail_when(|payload| payload == br#"{"i":3}"#);
/// assert_eq!(publisher.call_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockPublisher {
    name: String,
    calls: Arc<AtomicUsize>,
    payloads: Arc<Mutex<Vec<(TopicPath, Bytes)>>>,
    fail_when: Option<PayloadPredicate>,
    panic_when: Option<PayloadPredicate>,
    delay: Duration,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            payloads: Arc::new(Mutex::new(Vec::new())),
            fail_when: None,
            panic_when: None,
            delay: Duration::ZERO,
        }
    }

    /// Fail every publish whose payload matches
    pub fn fail_when(mut self, predicate: impl Fn(&[u8]) -> bool + Send + Sync + 'static) -> Self {
        self.fail_when = Some(Arc::new(predicate));
        self
    }

    /// Panic inside publish when the payload matches
    pub fn panic_when(mut self, predicate: impl Fn(&[u8]) -> bool + Send + Sync + 'static) -> Self {
        self.panic_when = Some(Arc::new(predicate));
        self
    }

    /// Sleep this long in every publish call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of publish invocations, including failed ones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Payloads received, in arrival order
    pub fn payloads(&self) -> Vec<Bytes> {
        self.recorded().into_iter().map(|(_, payload)| payload).collect()
    }

    /// Topics and payloads received, in arrival order
    pub fn recorded(&self) -> Vec<(TopicPath, Bytes)> {
        match self.payloads.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record(&self, topic: &TopicPath, payload: &Bytes) {
        let entry = (topic.clone(), payload.clone());
        match self.payloads.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl Publisher for MockPublisher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, topic: &TopicPath, payload: Bytes) -> Result<MessageId, ContractError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.record(topic, &payload);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(predicate) = &self.panic_when {
            if predicate(&payload) {
                panic!("mock publisher panic on call {call}");
            }
        }

        if let Some(predicate) = &self.fail_when {
            if predicate(&payload) {
                return Err(ContractError::publish(&self.name, "mock failure"));
            }
        }

        Ok(MessageId::new(format!("mock-{call}")))
    }
}
