//! NATS responder for payment session requests.

use futures::StreamExt;
use paybridge_core::ports::PaymentSessions;
use paybridge_core::{Error, PaymentSessionRequest, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

use crate::config::NatsConfig;
use crate::envelope::{Reply, ReplyError, RequestEnvelope};
use crate::health::HealthCheck;
use crate::metrics::NatsMetrics;

/// Turns request payloads into replies. Holds no transport state, so every
/// request is independent of the others.
#[derive(Clone)]
pub struct SessionRequestHandler {
    subject: String,
    sessions: Arc<dyn PaymentSessions>,
}

impl SessionRequestHandler {
    pub fn new(subject: impl Into<String>, sessions: Arc<dyn PaymentSessions>) -> Self {
        Self {
            subject: subject.into(),
            sessions,
        }
    }

    /// Decode, create the session and build the reply. Never fails: errors
    /// are carried in the reply.
    pub async fn handle(&self, payload: &[u8]) -> Reply {
        let envelope = match RequestEnvelope::decode(payload) {
            Ok(envelope) => envelope,
            Err(err) => return Reply::failure(None, ReplyError::from(&err)),
        };
        let id = envelope.id.clone();

        if !envelope.matches(&self.subject) {
            warn!(pattern = ?envelope.pattern, subject = %self.subject, "No handler for pattern");
            return Reply::failure(
                id,
                ReplyError {
                    status: 404,
                    message: format!(
                        "There is no matching message handler defined for pattern {}",
                        envelope.pattern.unwrap_or_default()
                    ),
                },
            );
        }

        let request: PaymentSessionRequest = match serde_json::from_value(envelope.data) {
            Ok(request) => request,
            Err(err) => return Reply::failure(id, ReplyError::from(&Error::from(err))),
        };

        match self.sessions.create_payment_session(&request).await {
            Ok(session) => Reply::success(id, session),
            Err(err) => {
                warn!(order_id = %request.order_id, error = %err, "Payment session request failed");
                Reply::failure(id, ReplyError::from(&err))
            }
        }
    }
}

/// Serves payment session requests over NATS request/reply.
#[derive(Clone)]
pub struct NatsResponder {
    client: async_nats::Client,
    config: NatsConfig,
    handler: SessionRequestHandler,
    metrics: Arc<NatsMetrics>,
    shutdown: Arc<AtomicBool>,
}

impl NatsResponder {
    /// Connect to the NATS servers in `config`.
    ///
    /// Connection state changes are reflected in `metrics`.
    pub async fn connect(
        config: NatsConfig,
        sessions: Arc<dyn PaymentSessions>,
        metrics: Arc<NatsMetrics>,
    ) -> Result<Self> {
        let urls = config.urls.join(",");
        info!("Connecting to NATS at {}", urls);

        let callback_metrics = metrics.clone();
        let client = async_nats::ConnectOptions::new()
            .connection_timeout(config.connection_timeout)
            .max_reconnects(config.max_reconnect_attempts)
            .event_callback(move |event| {
                let metrics = callback_metrics.clone();
                async move {
                    match event {
                        async_nats::Event::Connected => {
                            metrics.set_connected(true);
                            info!("NATS connection established");
                        }
                        async_nats::Event::Disconnected => {
                            metrics.set_connected(false);
                            metrics.record_disconnect();
                            warn!("NATS connection lost");
                        }
                        other => debug!(event = ?other, "NATS client event"),
                    }
                }
            })
            .connect(&urls)
            .await
            .map_err(|e| Error::EventBus(format!("Failed to connect to NATS: {}", e)))?;

        metrics.set_connected(true);

        let handler = SessionRequestHandler::new(config.subject.clone(), sessions);

        Ok(Self {
            client,
            config,
            handler,
            metrics,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get metrics.
    pub fn metrics(&self) -> &Arc<NatsMetrics> {
        &self.metrics
    }

    /// Check connection health.
    pub fn health_check(&self) -> HealthCheck {
        HealthCheck::from_metrics(&self.metrics)
    }

    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        self.client.connection_state() == async_nats::connection::State::Connected
    }

    /// Check if shutdown was requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Serve requests until the subscription ends.
    ///
    /// Each message is answered on its own task. The subscription ends when
    /// [`NatsResponder::shutdown`] drains the connection.
    pub async fn run(&self) -> Result<()> {
        let mut subscriber = self
            .client
            .queue_subscribe(self.config.subject.clone(), self.config.queue_group.clone())
            .await
            .map_err(|e| {
                Error::EventBus(format!(
                    "Failed to subscribe to {}: {}",
                    self.config.subject, e
                ))
            })?;

        info!(
            subject = %self.config.subject,
            queue_group = %self.config.queue_group,
            "Listening for payment session requests"
        );

        while let Some(message) = subscriber.next().await {
            let responder = self.clone();
            tokio::spawn(async move {
                responder.respond(message).await;
            });
        }

        info!(subject = %self.config.subject, "Subscription closed");
        Ok(())
    }

    async fn respond(&self, message: async_nats::Message) {
        self.metrics.record_receive(message.payload.len() as u64);

        let Some(reply_subject) = message.reply.clone() else {
            warn!(subject = %message.subject, "Dropping request without reply subject");
            return;
        };

        let reply = self.handler.handle(&message.payload).await;
        self.metrics.record_outcome(reply.is_success());

        let payload = match serde_json::to_vec(&reply) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Failed to encode reply");
                return;
            }
        };
        let payload_len = payload.len() as u64;

        match self.client.publish(reply_subject, payload.into()).await {
            Ok(()) => self.metrics.record_publish(payload_len),
            Err(e) => {
                self.metrics.record_publish_failure();
                error!(error = %e, "Failed to publish reply");
            }
        }
    }

    /// Graceful shutdown - drain the connection.
    pub async fn shutdown(&self) -> Result<()> {
        info!("Initiating graceful shutdown");
        self.shutdown.store(true, Ordering::SeqCst);

        if let Err(e) = self.client.drain().await {
            error!("Error draining NATS connection: {}", e);
        }

        self.metrics.set_connected(false);
        info!("NATS connection drained");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use paybridge_core::CheckoutSession;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    struct FakeSessions {
        calls: AtomicUsize,
        fail_with: Option<u16>,
    }

    impl FakeSessions {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with: None,
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_with: Some(status),
            })
        }
    }

    #[async_trait]
    impl PaymentSessions for FakeSessions {
        async fn create_payment_session(
            &self,
            request: &PaymentSessionRequest,
        ) -> Result<CheckoutSession> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            request.validate()?;
            if let Some(status) = self.fail_with {
                return Err(Error::Processor {
                    status: Some(status),
                    message: "Your card was declined".to_string(),
                });
            }
            Ok(serde_json::from_value(json!({
                "id": "cs_test_1",
                "url": "https://checkout.stripe.com/c/pay/cs_test_1",
                "metadata": {}
            }))?)
        }
    }

    fn request_data() -> serde_json::Value {
        json!({
            "currency": "usd",
            "orderId": "order-1",
            "items": [{ "name": "Mug", "price": 7.5, "quantity": 2 }]
        })
    }

    fn handler(sessions: Arc<FakeSessions>) -> SessionRequestHandler {
        SessionRequestHandler::new("create.payment.session", sessions)
    }

    #[tokio::test]
    async fn test_wrapped_request_echoes_id() {
        let sessions = FakeSessions::ok();
        let payload = serde_json::to_vec(&json!({
            "pattern": "create.payment.session",
            "data": request_data(),
            "id": "req-7"
        }))
        .unwrap();

        let reply = handler(sessions.clone()).handle(&payload).await;

        assert!(reply.is_success());
        assert_eq!(reply.id.as_deref(), Some("req-7"));
        assert_eq!(reply.response.unwrap().id, "cs_test_1");
        assert_eq!(sessions.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_bare_request() {
        let payload = serde_json::to_vec(&request_data()).unwrap();
        let reply = handler(FakeSessions::ok()).handle(&payload).await;
        assert!(reply.is_success());
        assert_eq!(reply.id, None);
    }

    #[tokio::test]
    async fn test_processor_error_is_replied() {
        let sessions = FakeSessions::failing(402);
        let payload = serde_json::to_vec(&request_data()).unwrap();

        let reply = handler(sessions.clone()).handle(&payload).await;

        let err = reply.err.expect("error reply");
        assert_eq!(err.status, 402);
        assert!(err.message.contains("Your card was declined"));
        // Not retried.
        assert_eq!(sessions.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_payload_skips_processor() {
        let sessions = FakeSessions::ok();
        let payload = serde_json::to_vec(&json!({
            "pattern": "create.payment.session",
            "data": { "currency": "usd", "orderId": "1", "items": [], "coupon": "FREE" },
            "id": "req-8"
        }))
        .unwrap();

        let reply = handler(sessions.clone()).handle(&payload).await;

        assert_eq!(reply.id.as_deref(), Some("req-8"));
        assert_eq!(reply.err.unwrap().status, 400);
        assert_eq!(sessions.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pattern_mismatch() {
        let sessions = FakeSessions::ok();
        let payload = serde_json::to_vec(&json!({
            "pattern": "find.all.orders",
            "data": request_data(),
            "id": "req-9"
        }))
        .unwrap();

        let reply = handler(sessions.clone()).handle(&payload).await;

        assert_eq!(reply.err.unwrap().status, 404);
        assert_eq!(sessions.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_garbage_payload() {
        let reply = handler(FakeSessions::ok()).handle(b"\x00\x01").await;
        assert_eq!(reply.err.unwrap().status, 400);
    }

    #[tokio::test]
    #[ignore] // Requires NATS server
    async fn test_connect() {
        let responder = NatsResponder::connect(
            NatsConfig::new("nats://localhost:4222"),
            FakeSessions::ok(),
            NatsMetrics::new(),
        )
        .await;
        assert!(responder.is_ok());
    }
}
