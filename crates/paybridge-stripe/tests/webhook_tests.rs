//! End-to-end tests for webhook verification and dispatch.

use async_trait::async_trait;
use paybridge_stripe::{
    ChargeSucceededData, SignatureError, SignatureVerifier, WebhookError, WebhookHandler,
    WebhookOutcome, WebhookReceiver, signature_header,
};
use std::sync::{Arc, Mutex};

const SECRET: &str = "whsec_test_secret";

#[derive(Debug, Clone, PartialEq)]
enum Dispatched {
    PaymentCompleted(ChargeSucceededData),
    Unhandled(String),
}

#[derive(Default)]
struct RecordingHandler {
    calls: Mutex<Vec<Dispatched>>,
}

impl RecordingHandler {
    fn calls(&self) -> Vec<Dispatched> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookHandler for RecordingHandler {
    async fn on_charge_succeeded(&self, _event_id: &str, data: ChargeSucceededData) {
        self.calls
            .lock()
            .unwrap()
            .push(Dispatched::PaymentCompleted(data));
    }

    async fn on_unhandled(&self, _event_id: &str, event_type: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(Dispatched::Unhandled(event_type.to_string()));
    }
}

fn receiver() -> (WebhookReceiver, Arc<RecordingHandler>) {
    let handler = Arc::new(RecordingHandler::default());
    let receiver = WebhookReceiver::new(SignatureVerifier::new(SECRET, 300), handler.clone());
    (receiver, handler)
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn event_body(event_type: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "id": "evt_1",
        "object": "event",
        "type": event_type,
        "created": 1_700_000_000,
        "livemode": false,
        "data": {
            "object": {
                "id": "ch_1",
                "object": "charge",
                "amount": 4000,
                "currency": "usd",
                "metadata": { "orderId": "order-42" }
            }
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn test_charge_succeeded_is_dispatched_once() {
    let (receiver, handler) = receiver();
    let body = event_body("charge.succeeded");
    let header = signature_header(SECRET, now(), &body);

    let outcome = receiver.handle(&body, Some(&header)).await;

    assert_eq!(outcome.status_code(), 200);
    assert_eq!(
        outcome.body(),
        serde_json::json!({ "sig": header }).to_string()
    );

    let calls = handler.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        Dispatched::PaymentCompleted(data) => {
            assert_eq!(data.charge_id, "ch_1");
            assert_eq!(data.order_id.as_deref(), Some("order-42"));
        }
        other => panic!("unexpected dispatch: {other:?}"),
    }
}

#[tokio::test]
async fn test_other_event_types_are_acknowledged() {
    let (receiver, handler) = receiver();
    let body = event_body("charge.refunded");
    let header = signature_header(SECRET, now(), &body);

    let outcome = receiver.handle(&body, Some(&header)).await;

    assert!(outcome.is_acknowledged());
    assert_eq!(
        handler.calls(),
        vec![Dispatched::Unhandled("charge.refunded".to_string())]
    );
}

#[tokio::test]
async fn test_missing_signature_is_rejected_without_dispatch() {
    let (receiver, handler) = receiver();
    let body = event_body("charge.succeeded");

    let outcome = receiver.handle(&body, None).await;

    assert_eq!(outcome.status_code(), 400);
    assert!(outcome.body().starts_with("Webhook Error: "));
    assert!(handler.calls().is_empty());
}

#[tokio::test]
async fn test_forged_signature_is_rejected_without_dispatch() {
    let (receiver, handler) = receiver();
    let body = event_body("charge.succeeded");
    let header = signature_header("whsec_attacker", now(), &body);

    let outcome = receiver.handle(&body, Some(&header)).await;

    assert!(matches!(
        outcome,
        WebhookOutcome::Rejected(WebhookError::Signature(
            SignatureError::NoMatchingSignature
        ))
    ));
    assert!(handler.calls().is_empty());
}

#[tokio::test]
async fn test_unparseable_body_is_never_decoded_when_unsigned() {
    let (receiver, handler) = receiver();

    let outcome = receiver.handle(b"not json at all", Some("t=1,v1=00")).await;

    assert!(matches!(
        outcome,
        WebhookOutcome::Rejected(WebhookError::Signature(_))
    ));
    assert!(handler.calls().is_empty());
}

#[tokio::test]
async fn test_signed_garbage_is_a_parse_error() {
    let (receiver, handler) = receiver();
    let body = b"{\"hello\":\"world\"}";
    let header = signature_header(SECRET, now(), body);

    let outcome = receiver.handle(body, Some(&header)).await;

    assert!(matches!(outcome, WebhookOutcome::Rejected(WebhookError::Parse(_))));
    assert_eq!(outcome.status_code(), 400);
    assert!(handler.calls().is_empty());
}
