//! Paybridge Core
//!
//! Domain types, money conversion, and error handling shared by the
//! Paybridge crates. Adapters for Stripe, NATS and HTTP live in their own
//! crates and meet here through the traits in [`ports`].

pub mod error;
pub mod money;
pub mod ports;
pub mod session;

pub use error::{Error, Result};
pub use money::to_minor_units;
pub use session::{CheckoutSession, PaymentItem, PaymentSessionRequest};
