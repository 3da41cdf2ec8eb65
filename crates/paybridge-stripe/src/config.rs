//! Stripe client configuration.

use std::fmt;

/// Default Stripe API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Default webhook timestamp tolerance used by Stripe's own SDKs.
pub const DEFAULT_WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Stripe client configuration.
#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    /// Where Stripe sends the customer after a successful payment.
    pub success_url: String,
    /// Where Stripe sends the customer after abandoning checkout.
    pub cancel_url: String,
    pub api_base: String,
    /// Maximum age of a signed webhook, in seconds. Zero disables the check.
    pub webhook_tolerance_secs: i64,
}

impl StripeConfig {
    pub fn new(
        secret_key: impl Into<String>,
        webhook_secret: impl Into<String>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            webhook_tolerance_secs: DEFAULT_WEBHOOK_TOLERANCE_SECS,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_webhook_tolerance(mut self, secs: i64) -> Self {
        self.webhook_tolerance_secs = secs;
        self
    }
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"<redacted>")
            .field("webhook_secret", &"<redacted>")
            .field("success_url", &self.success_url)
            .field("cancel_url", &self.cancel_url)
            .field("api_base", &self.api_base)
            .field("webhook_tolerance_secs", &self.webhook_tolerance_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_config() {
        let config = StripeConfig::new(
            "sk_test_xxx",
            "whsec_xxx",
            "http://localhost:3003/payments/success",
            "http://localhost:3003/payments/cancel",
        )
        .with_api_base("http://127.0.0.1:12111");

        assert_eq!(config.api_base, "http://127.0.0.1:12111");
        assert_eq!(config.webhook_tolerance_secs, DEFAULT_WEBHOOK_TOLERANCE_SECS);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = StripeConfig::new("sk_live_secret", "whsec_secret", "a", "b");
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk_live_secret"));
        assert!(!printed.contains("whsec_secret"));
    }
}
