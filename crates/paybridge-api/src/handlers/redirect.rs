//! Landing pages for the checkout success and cancel redirects.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub ok: bool,
    pub message: &'static str,
}

pub async fn success() -> Json<RedirectResponse> {
    Json(RedirectResponse {
        ok: true,
        message: "Payment successful",
    })
}

pub async fn cancel() -> Json<RedirectResponse> {
    Json(RedirectResponse {
        ok: false,
        message: "Payment cancelled",
    })
}
