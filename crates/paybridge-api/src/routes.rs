//! API route definitions.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, redirect, webhook};
use crate::middleware::request_id;
use crate::state::AppState;

/// Largest webhook body accepted. Stripe events are far smaller.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/payments", payment_routes())
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn payment_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/webhook", post(webhook::stripe_webhook))
        .route("/success", get(redirect::success))
        .route("/cancel", get(redirect::cancel))
}
