//! Paybridge entrypoint.

use anyhow::Context;
use paybridge_api::AppState;
use paybridge_nats::{NatsMetrics, NatsResponder};
use paybridge_stripe::{LoggingWebhookHandler, SignatureVerifier, StripeClient, WebhookReceiver};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

mod config;
mod telemetry;

use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Nothing is bound or connected until the configuration is known good.
    let config = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init_tracing(config.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.port,
        stripe = ?config.stripe,
        "Starting paybridge"
    );

    let stripe = Arc::new(StripeClient::new(config.stripe.clone()));
    let receiver = WebhookReceiver::new(
        SignatureVerifier::new(
            config.stripe.webhook_secret.clone(),
            config.stripe.webhook_tolerance_secs,
        ),
        Arc::new(LoggingWebhookHandler),
    );

    let metrics = NatsMetrics::new();
    let responder = NatsResponder::connect(config.nats.clone(), stripe, metrics.clone())
        .await
        .context("failed to connect to NATS")?;

    let bus = responder.clone();
    let bus_task = tokio::spawn(async move {
        if let Err(e) = bus.run().await {
            error!(error = %e, "Payment session responder stopped");
        }
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let state = Arc::new(AppState::new(receiver, metrics));
    paybridge_api::serve(listener, state, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    responder.shutdown().await?;
    if let Err(e) = bus_task.await {
        error!(error = %e, "Responder task panicked");
    }

    info!("Paybridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
