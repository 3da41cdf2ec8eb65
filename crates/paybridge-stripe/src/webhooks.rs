//! Stripe webhook receiver.
//!
//! A delivery goes through verify, parse, dispatch and acknowledge in that
//! order. The body is only decoded once its signature has been checked, so a
//! [`StripeEvent`] never exists for forged or tampered payloads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::checkout::ORDER_ID_METADATA_KEY;
use crate::signature::{SignatureError, SignatureVerifier};

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error(transparent)]
    Signature(#[from] SignatureError),
    #[error("Invalid webhook payload: {0}")]
    Parse(String),
}

/// Stripe event type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StripeEventType {
    ChargeSucceeded,
    /// Any type without a dedicated handler, with the tag as sent.
    Other(String),
}

impl StripeEventType {
    pub fn as_str(&self) -> &str {
        match self {
            StripeEventType::ChargeSucceeded => "charge.succeeded",
            StripeEventType::Other(tag) => tag,
        }
    }
}

impl From<String> for StripeEventType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "charge.succeeded" => StripeEventType::ChargeSucceeded,
            _ => StripeEventType::Other(tag),
        }
    }
}

impl From<StripeEventType> for String {
    fn from(event_type: StripeEventType) -> Self {
        event_type.as_str().to_string()
    }
}

impl fmt::Display for StripeEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stripe webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: StripeEventType,
    pub data: EventData,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub livemode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// Fields of interest on a succeeded charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeSucceededData {
    pub charge_id: String,
    pub amount: i64,
    pub currency: String,
    pub payment_intent: Option<String>,
    pub order_id: Option<String>,
    pub receipt_url: Option<String>,
}

impl ChargeSucceededData {
    fn from_object(obj: &serde_json::Value) -> Self {
        Self {
            charge_id: obj["id"].as_str().unwrap_or_default().to_string(),
            amount: obj["amount"].as_i64().unwrap_or(0),
            currency: obj["currency"].as_str().unwrap_or_default().to_string(),
            payment_intent: obj["payment_intent"].as_str().map(|s| s.to_string()),
            order_id: obj["metadata"][ORDER_ID_METADATA_KEY]
                .as_str()
                .map(|s| s.to_string()),
            receipt_url: obj["receipt_url"].as_str().map(|s| s.to_string()),
        }
    }
}

/// Reacts to verified webhook events.
#[async_trait]
pub trait WebhookHandler: Send + Sync {
    async fn on_charge_succeeded(&self, event_id: &str, data: ChargeSucceededData);
    async fn on_unhandled(&self, event_id: &str, event_type: &str);
}

/// Handler that only logs. No order state is touched.
pub struct LoggingWebhookHandler;

#[async_trait]
impl WebhookHandler for LoggingWebhookHandler {
    async fn on_charge_succeeded(&self, event_id: &str, data: ChargeSucceededData) {
        info!(
            %event_id,
            charge_id = %data.charge_id,
            amount = data.amount,
            currency = %data.currency,
            order_id = ?data.order_id,
            "Payment completed"
        );
    }

    async fn on_unhandled(&self, event_id: &str, event_type: &str) {
        info!(%event_id, "Unhandled event type {}", event_type);
    }
}

/// Dispatch a verified event to the handler.
pub async fn dispatch(handler: &dyn WebhookHandler, event: StripeEvent) {
    match &event.event_type {
        StripeEventType::ChargeSucceeded => {
            let data = ChargeSucceededData::from_object(&event.data.object);
            handler.on_charge_succeeded(&event.id, data).await;
        }
        StripeEventType::Other(tag) => handler.on_unhandled(&event.id, tag).await,
    }
}

/// Result of handling one delivery.
#[derive(Debug)]
pub enum WebhookOutcome {
    /// Verified and dispatched. Carries the signature header for the reply.
    Acknowledged { signature: String },
    /// Verification or parsing failed; nothing was dispatched.
    Rejected(WebhookError),
}

impl WebhookOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            WebhookOutcome::Acknowledged { .. } => 200,
            WebhookOutcome::Rejected(_) => 400,
        }
    }

    /// Response body: `{"sig": ...}` when acknowledged, plain text otherwise.
    pub fn body(&self) -> String {
        match self {
            WebhookOutcome::Acknowledged { signature } => {
                serde_json::json!({ "sig": signature }).to_string()
            }
            WebhookOutcome::Rejected(err) => format!("Webhook Error: {err}"),
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        matches!(self, WebhookOutcome::Acknowledged { .. })
    }
}

/// Verifies, parses and dispatches webhook deliveries.
#[derive(Clone)]
pub struct WebhookReceiver {
    verifier: SignatureVerifier,
    handler: Arc<dyn WebhookHandler>,
}

impl WebhookReceiver {
    pub fn new(verifier: SignatureVerifier, handler: Arc<dyn WebhookHandler>) -> Self {
        Self { verifier, handler }
    }

    /// Handle one delivery: the raw body exactly as received and the
    /// `stripe-signature` header, if any.
    pub async fn handle(&self, raw_body: &[u8], signature: Option<&str>) -> WebhookOutcome {
        if let Err(err) = self.verifier.verify(raw_body, signature) {
            warn!(error = %err, "Rejected webhook delivery");
            return WebhookOutcome::Rejected(err.into());
        }

        let event: StripeEvent = match serde_json::from_slice(raw_body) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Verified webhook body is not a Stripe event");
                return WebhookOutcome::Rejected(WebhookError::Parse(e.to_string()));
            }
        };

        info!(event_id = %event.id, event_type = %event.event_type, "Processing Stripe webhook");
        dispatch(self.handler.as_ref(), event).await;

        WebhookOutcome::Acknowledged {
            signature: signature.unwrap_or_default().to_string(),
        }
    }
}
