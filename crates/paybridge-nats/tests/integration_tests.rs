//! Integration tests for paybridge-nats.
//!
//! These tests require a running NATS server.
//! Run with: `cargo test -p paybridge-nats --features integration`
//!
//! To start NATS: `docker run -p 4222:4222 nats:latest`

#![cfg(feature = "integration")]

use async_trait::async_trait;
use paybridge_core::ports::PaymentSessions;
use paybridge_core::{CheckoutSession, PaymentSessionRequest, Result};
use paybridge_nats::{CREATE_PAYMENT_SESSION, NatsConfig, NatsMetrics, NatsResponder, Reply};
use std::sync::Arc;
use std::time::Duration;

const NATS_URL: &str = "nats://localhost:4222";

struct EchoSessions;

#[async_trait]
impl PaymentSessions for EchoSessions {
    async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<CheckoutSession> {
        request.validate()?;
        Ok(serde_json::from_value(serde_json::json!({
            "id": format!("cs_{}", request.order_id),
            "url": "https://checkout.stripe.com/c/pay/test"
        }))?)
    }
}

async fn start_responder(queue_group: &str) -> NatsResponder {
    let config = NatsConfig::new(NATS_URL).with_queue_group(queue_group);
    let responder = NatsResponder::connect(config, Arc::new(EchoSessions), NatsMetrics::new())
        .await
        .expect("connect");

    let runner = responder.clone();
    tokio::spawn(async move { runner.run().await });
    // Let the subscription register before requests are sent.
    tokio::time::sleep(Duration::from_millis(100)).await;
    responder
}

#[tokio::test]
async fn test_request_reply() {
    let responder = start_responder("it-request-reply").await;
    let client = async_nats::connect(NATS_URL).await.expect("client");

    let payload = serde_json::to_vec(&serde_json::json!({
        "pattern": CREATE_PAYMENT_SESSION,
        "id": "it-1",
        "data": {
            "currency": "usd",
            "orderId": "order-it",
            "items": [{ "name": "Mug", "price": 7.5, "quantity": 1 }]
        }
    }))
    .unwrap();

    let message = client
        .request(CREATE_PAYMENT_SESSION, payload.into())
        .await
        .expect("reply");
    let reply: Reply = serde_json::from_slice(&message.payload).expect("decode reply");

    assert_eq!(reply.id.as_deref(), Some("it-1"));
    assert_eq!(reply.response.expect("session").id, "cs_order-it");

    let snapshot = responder.metrics().snapshot();
    assert_eq!(snapshot.requests_succeeded, 1);
    assert!(snapshot.bytes_published > 0);
}

#[tokio::test]
async fn test_invalid_request_reply() {
    let _responder = start_responder("it-invalid").await;
    let client = async_nats::connect(NATS_URL).await.expect("client");

    let message = client
        .request(CREATE_PAYMENT_SESSION, b"{\"currency\":\"usd\"}".to_vec().into())
        .await
        .expect("reply");
    let reply: Reply = serde_json::from_slice(&message.payload).expect("decode reply");

    assert_eq!(reply.err.expect("error").status, 400);
}

#[tokio::test]
async fn test_health_check() {
    let responder = start_responder("it-health").await;

    let health = responder.health_check();
    assert!(health.status.is_healthy());
    assert!(responder.is_connected());
}

#[tokio::test]
async fn test_graceful_shutdown() {
    let responder = start_responder("it-shutdown").await;

    assert!(!responder.is_shutdown());
    responder.shutdown().await.expect("shutdown");

    assert!(responder.is_shutdown());
    assert!(!responder.metrics().snapshot().connected);
}
