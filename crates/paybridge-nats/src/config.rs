//! Configuration for the NATS responder.

use std::time::Duration;

/// Subject on which payment session requests arrive.
pub const CREATE_PAYMENT_SESSION: &str = "create.payment.session";

/// Configuration for the NATS responder.
#[derive(Debug, Clone)]
pub struct NatsConfig {
    /// NATS server URLs (several for a cluster).
    pub urls: Vec<String>,
    /// Subject to serve.
    pub subject: String,
    /// Queue group shared by all instances of the service.
    pub queue_group: String,
    /// Connection timeout.
    pub connection_timeout: Duration,
    /// Maximum reconnection attempts.
    pub max_reconnect_attempts: Option<usize>,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            urls: vec!["nats://localhost:4222".to_string()],
            subject: CREATE_PAYMENT_SESSION.to_string(),
            queue_group: "payments".to_string(),
            connection_timeout: Duration::from_secs(10),
            max_reconnect_attempts: None, // Unlimited
        }
    }
}

impl NatsConfig {
    /// Create a new config with a single URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            ..Default::default()
        }
    }

    /// Set multiple server URLs for cluster support.
    pub fn with_urls(mut self, urls: Vec<String>) -> Self {
        self.urls = urls;
        self
    }

    /// Set the queue group.
    pub fn with_queue_group(mut self, group: impl Into<String>) -> Self {
        self.queue_group = group.into();
        self
    }

    /// Set max reconnection attempts.
    pub fn with_max_reconnects(mut self, max: usize) -> Self {
        self.max_reconnect_attempts = Some(max);
        self
    }
}
