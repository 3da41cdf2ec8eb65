//! Port traits (hexagonal architecture).
//!
//! These traits define the interfaces between the core domain and external adapters.

use crate::Result;
use crate::session::{CheckoutSession, PaymentSessionRequest};
use async_trait::async_trait;

/// Creates hosted checkout sessions with a payment processor.
#[async_trait]
pub trait PaymentSessions: Send + Sync {
    /// Create a one-time card payment session for the request.
    ///
    /// Failures of the upstream call are returned as [`crate::Error::Processor`]
    /// and are not retried.
    async fn create_payment_session(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<CheckoutSession>;
}
