//! Mapping of payment session requests onto Stripe checkout parameters.

use paybridge_core::{PaymentSessionRequest, Result};

use crate::config::StripeConfig;

/// Metadata key carrying the originating order on the payment intent.
pub const ORDER_ID_METADATA_KEY: &str = "orderId";

/// Parameters for `POST /v1/checkout/sessions`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionParams {
    pub order_id: String,
    pub line_items: Vec<LineItem>,
    pub success_url: String,
    pub cancel_url: String,
}

/// A line item with inline price data.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub currency: String,
    pub product_name: String,
    /// Unit price in minor units.
    pub unit_amount: i64,
    pub quantity: u32,
}

impl CheckoutSessionParams {
    /// Build the parameters for a validated request.
    pub fn from_request(request: &PaymentSessionRequest, config: &StripeConfig) -> Result<Self> {
        let currency = request.normalized_currency();

        let line_items = request
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Ok(LineItem {
                    currency: currency.clone(),
                    product_name: item.name.clone(),
                    unit_amount: item.unit_amount(index)?,
                    quantity: item.quantity,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            order_id: request.order_id.clone(),
            line_items,
            success_url: config.success_url.clone(),
            cancel_url: config.cancel_url.clone(),
        })
    }

    /// Encode as Stripe's bracketed form fields.
    ///
    /// Card is the only payment method and the mode is always a one-time
    /// payment.
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
            (
                format!("payment_intent_data[metadata][{ORDER_ID_METADATA_KEY}]"),
                self.order_id.clone(),
            ),
        ];

        for (i, item) in self.line_items.iter().enumerate() {
            let prefix = format!("line_items[{i}]");
            form.push((
                format!("{prefix}[price_data][currency]"),
                item.currency.clone(),
            ));
            form.push((
                format!("{prefix}[price_data][product_data][name]"),
                item.product_name.clone(),
            ));
            form.push((
                format!("{prefix}[price_data][unit_amount]"),
                item.unit_amount.to_string(),
            ));
            form.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
        }

        form
    }

    /// Sum of all line totals in minor units.
    pub fn amount_total(&self) -> i64 {
        self.line_items
            .iter()
            .map(|item| item.unit_amount.saturating_mul(i64::from(item.quantity)))
            .fold(0i64, |acc, line| acc.saturating_add(line))
    }
}
