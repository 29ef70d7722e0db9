//! Publish metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Process-wide publish counters, shared by every request
#[derive(Debug, Default)]
pub struct PublishMetrics {
    /// Publishes currently awaiting the broker
    in_flight: AtomicUsize,
    /// Total successful publishes
    published_count: AtomicU64,
    /// Total failed publishes (serialization, broker, aborted task)
    failure_count: AtomicU64,
}

impl PublishMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current in-flight publishes
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Count one publish as in flight until the guard drops
    pub fn track_in_flight(&self) -> InFlightGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightGuard { metrics: self }
    }

    /// Get total published count
    pub fn published_count(&self) -> u64 {
        self.published_count.load(Ordering::Relaxed)
    }

    /// Increment published count
    pub fn inc_published_count(&self) {
        self.published_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            in_flight: self.in_flight(),
            published_count: self.published_count(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of publish metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub in_flight: usize,
    pub published_count: u64,
    pub failure_count: u64,
}

/// Decrements the in-flight gauge on drop, including on panic
pub struct InFlightGuard<'a> {
    metrics: &'a PublishMetrics,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.metrics.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}
