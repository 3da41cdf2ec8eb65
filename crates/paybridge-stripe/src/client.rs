//! Stripe API client.

use async_trait::async_trait;
use paybridge_core::ports::PaymentSessions;
use paybridge_core::{CheckoutSession, Error, PaymentSessionRequest, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::checkout::CheckoutSessionParams;
use crate::config::StripeConfig;

/// Error object returned by the Stripe API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub param: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeApiError,
}

/// Stripe client wrapper.
#[derive(Debug, Clone)]
pub struct StripeClient {
    config: StripeConfig,
    http: reqwest::Client,
}

impl StripeClient {
    /// Create a new Stripe client.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Create a checkout session. The call is made once; failures are
    /// returned to the caller as [`Error::Processor`].
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession> {
        let url = format!(
            "{}/v1/checkout/sessions",
            self.config.api_base.trim_end_matches('/')
        );
        debug!(%url, line_items = params.line_items.len(), "Creating Stripe checkout session");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.secret_key, None::<&str>)
            .form(&params.to_form())
            .send()
            .await
            .map_err(|e| Error::Processor {
                status: None,
                message: format!("Stripe request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = api_error(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %err, "Stripe rejected checkout session");
            return Err(err);
        }

        response.json::<CheckoutSession>().await.map_err(|e| Error::Processor {
            status: None,
            message: format!("Failed to parse Stripe response: {e}"),
        })
    }
}

#[async_trait]
impl PaymentSessions for StripeClient {
    async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<CheckoutSession> {
        request.validate()?;
        let params = CheckoutSessionParams::from_request(request, &self.config)?;

        let session = self.create_checkout_session(&params).await?;
        info!(
            order_id = %request.order_id,
            session_id = %session.id,
            amount_total = params.amount_total(),
            "Checkout session created"
        );
        Ok(session)
    }
}

fn api_error(status: u16, body: &str) -> Error {
    let message = match serde_json::from_str::<StripeErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .message
            .unwrap_or_else(|| format!("Stripe returned {status}")),
        Err(_) if body.is_empty() => format!("Stripe returned {status}"),
        Err(_) => format!("Stripe returned {status}: {body}"),
    };

    Error::Processor {
        status: Some(status),
        message,
    }
}
