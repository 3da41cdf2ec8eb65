//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode};
use paybridge_nats::HealthCheck;
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub nats: BusStatus,
}

#[derive(Serialize)]
pub struct BusStatus {
    pub connected: bool,
    pub disconnects: u64,
    pub requests_received: u64,
    pub requests_failed: u64,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Ready while the bus connection is up.
pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, Json<ReadyResponse>) {
    let check = HealthCheck::from_metrics(&state.bus_metrics);
    let code = if check.status.is_operational() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(ReadyResponse {
            status: check.status.as_str().to_string(),
            nats: BusStatus {
                connected: check.connected,
                disconnects: check.disconnects,
                requests_received: check.requests_received,
                requests_failed: check.requests_failed,
            },
        }),
    )
}
