//! `lockbox` — binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`ServiceConfig`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP export).
//! 3. Build the single Cloud KMS client shared by all requests.
//! 4. Build the Axum router and serve until SIGINT/SIGTERM.
//! 5. Drain in-flight requests, release the client, flush telemetry.

mod config;
mod encrypt;
mod kms;
mod registry;
mod resource;
mod server;
mod shutdown;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use config::ServiceConfig;
use kms::GcpKms;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = ServiceConfig::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        key_ring = %cfg.key_ring_path(),
        port = cfg.port,
        "lockbox starting"
    );

    // -----------------------------------------------------------------------
    // 3. Cloud KMS client
    // -----------------------------------------------------------------------
    let kms = Arc::new(GcpKms::connect().await?);

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(kms, cfg.key_ring_path());
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .context("HTTP server failed")?;

    // -----------------------------------------------------------------------
    // 5. Teardown
    // -----------------------------------------------------------------------
    // The router, and with it the last reference to the KMS client, was
    // consumed by `axum::serve` and is dropped by now.
    info!("lockbox stopped");
    telemetry::shutdown_telemetry();
    Ok(())
}
