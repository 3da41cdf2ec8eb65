//! Stripe integration for Paybridge.
//!
//! Creates hosted checkout sessions from payment session requests and
//! receives signed webhook deliveries.

pub mod checkout;
pub mod client;
pub mod config;
pub mod signature;
pub mod webhooks;

pub use checkout::{CheckoutSessionParams, LineItem, ORDER_ID_METADATA_KEY};
pub use client::{StripeApiError, StripeClient};
pub use config::StripeConfig;
pub use signature::{
    SIGNATURE_HEADER, SignatureError, SignatureHeader, SignatureVerifier, sign, signature_header,
};
pub use webhooks::{
    ChargeSucceededData, EventData, LoggingWebhookHandler, StripeEvent, StripeEventType,
    WebhookError, WebhookHandler, WebhookOutcome, WebhookReceiver, dispatch,
};
