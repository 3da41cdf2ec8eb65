//! Metrics for the NATS responder.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the NATS responder.
#[derive(Debug, Default)]
pub struct NatsMetrics {
    /// Requests received on the served subject.
    pub requests_received: AtomicU64,
    /// Requests answered with a checkout session.
    pub requests_succeeded: AtomicU64,
    /// Requests answered with an error.
    pub requests_failed: AtomicU64,
    /// Replies published.
    pub replies_published: AtomicU64,
    /// Replies that could not be published.
    pub publish_failures: AtomicU64,
    /// Times the connection was lost.
    pub disconnects: AtomicU64,
    /// Current connection state (0 = disconnected, 1 = connected).
    pub connected: AtomicU64,
    /// Total bytes received.
    pub bytes_received: AtomicU64,
    /// Total bytes published.
    pub bytes_published: AtomicU64,
}

impl NatsMetrics {
    /// Create new metrics instance.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_receive(&self, bytes: u64) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, success: bool) {
        let counter = if success {
            &self.requests_succeeded
        } else {
            &self.requests_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_publish(&self, bytes: u64) {
        self.replies_published.fetch_add(1, Ordering::Relaxed);
        self.bytes_published.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_publish_failure(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::Relaxed);
    }

    /// Set connection state.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected as u64, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            requests_succeeded: self.requests_succeeded.load(Ordering::Relaxed),
            requests_failed: self.requests_failed.load(Ordering::Relaxed),
            replies_published: self.replies_published.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            disconnects: self.disconnects.load(Ordering::Relaxed),
            connected: self.connected.load(Ordering::Relaxed) == 1,
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_published: self.bytes_published.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_received: u64,
    pub requests_succeeded: u64,
    pub requests_failed: u64,
    pub replies_published: u64,
    pub publish_failures: u64,
    pub disconnects: u64,
    pub connected: bool,
    pub bytes_received: u64,
    pub bytes_published: u64,
}
