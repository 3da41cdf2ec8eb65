//! Payment session request and checkout session types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::money::to_minor_units;
use crate::{Error, Result};

/// Request to open a hosted checkout session for an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PaymentSessionRequest {
    /// ISO 4217 currency code, e.g. `usd`.
    pub currency: String,
    /// Order identifier, opaque to this service.
    pub order_id: String,
    pub items: Vec<PaymentItem>,
}

/// A single order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl PaymentSessionRequest {
    /// Check the request before it is sent upstream.
    pub fn validate(&self) -> Result<()> {
        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::invalid_request(
                "currency",
                "must be a 3-letter ISO currency code",
            ));
        }

        if self.order_id.trim().is_empty() {
            return Err(Error::invalid_request("orderId", "must not be empty"));
        }

        if self.items.is_empty() {
            return Err(Error::invalid_request(
                "items",
                "must contain at least 1 element",
            ));
        }

        for (index, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(Error::invalid_request(
                    format!("items[{index}].name"),
                    "must not be empty",
                ));
            }
            if item.quantity < 1 {
                return Err(Error::invalid_request(
                    format!("items[{index}].quantity"),
                    "must be at least 1",
                ));
            }
            item.unit_amount(index)?;
        }

        Ok(())
    }

    /// Currency code in the lower-case form payment processors expect.
    pub fn normalized_currency(&self) -> String {
        self.currency.trim().to_ascii_lowercase()
    }
}

impl PaymentItem {
    /// Unit price in minor units. `index` locates the item in error messages.
    pub fn unit_amount(&self, index: usize) -> Result<i64> {
        to_minor_units(self.price, &format!("items[{index}].price"))
    }
}

/// Checkout session returned by the payment processor.
///
/// Only `id` and `url` are interpreted; every other field is carried through
/// to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted page the customer is redirected to. Absent once the session
    /// has expired or completed.
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
