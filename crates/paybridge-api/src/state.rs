//! Application state shared across handlers.

use paybridge_nats::NatsMetrics;
use paybridge_stripe::WebhookReceiver;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub webhooks: WebhookReceiver,
    /// Connection state of the bus responder, for readiness.
    pub bus_metrics: Arc<NatsMetrics>,
}

impl AppState {
    pub fn new(webhooks: WebhookReceiver, bus_metrics: Arc<NatsMetrics>) -> Self {
        Self {
            webhooks,
            bus_metrics,
        }
    }
}
