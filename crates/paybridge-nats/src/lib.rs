//! NATS request/reply transport for Paybridge.

pub mod config;
pub mod envelope;
pub mod health;
pub mod metrics;
mod responder;

pub use config::{CREATE_PAYMENT_SESSION, NatsConfig};
pub use envelope::{Reply, ReplyError, RequestEnvelope};
pub use health::{HealthCheck, HealthStatus};
pub use metrics::{MetricsSnapshot, NatsMetrics};
pub use responder::{NatsResponder, SessionRequestHandler};
