//! SithWash Dashboard API Server
//!
//! REST API serving heuristic fraud predictions and synthetic transactions
//! for the AML dashboard.
//!
//! Usage:
//!   cargo run --bin sithwash_api
//!
//! Environment:
//!   PORT / SITHWASH_PORT     - Server port (default: 8080)
//!   SITHWASH_HOST            - Server host (default: 0.0.0.0)
//!   SITHWASH_MODEL_PATH      - Alternate model schema JSON
//!   SITHWASH_STRICT_SCHEMA   - Reject misaligned schemas (default: false)
//!   RUST_LOG                 - Log filter (default: info)

use sithwash::api::{create_router, AppState};
use sithwash::utils::constants::APP_VERSION;
use sithwash::{AppConfig, ModelSchema, ScoringTelemetry, SithEngine};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let config = AppConfig::from_env()?;
    let schema = ModelSchema::load(config.model_path.as_deref(), config.strict_schema)?;
    let engine = SithEngine::new(Arc::new(schema));

    // Initialize telemetry
    let telemetry = Arc::new(ScoringTelemetry::new());
    let telemetry_for_shutdown = telemetry.clone();

    let addr: SocketAddr = config.bind_address().parse()?;

    // Create app state
    let state = Arc::new(AppState::new(engine, config, telemetry));
    let cleanup = state.spawn_cache_cleanup();
    info!("🧹 Background cache cleanup task started");

    // Create router
    let app = create_router(state);

    info!("🚀 SithWash API starting on http://{}", addr);
    info!("");
    info!("Endpoints:");
    info!("  GET  /v1/health                  - Health check");
    info!("  GET  /v1/model                   - Model schema summary");
    info!("  POST /v1/predict                 - Score one attribute record");
    info!("  POST /v1/analyze                 - Score and wrap as a dashboard transaction");
    info!("  GET  /v1/transactions?count=N    - Synthetic scored batch");
    info!("  GET  /v1/transactions/real-world - Fixed dataset patterns");
    info!("  GET  /v1/transactions/:id        - Cached transaction detail");
    info!("  GET  /v1/sample?fraudulent=bool  - One synthetic attribute record");
    info!("  GET  /v1/stats                   - Scoring statistics");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    // Start server with graceful shutdown
    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to listen for Ctrl+C: {}", e);
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Graceful shutdown sequence
    info!("🛑 Shutdown signal received, cleaning up...");
    cleanup.abort();

    let stats = telemetry_for_shutdown.get_stats();
    info!("{}", stats.summary());

    match telemetry_for_shutdown.export_stats_json() {
        Ok(path) => info!("   ✅ Stats exported to: {}", path.display()),
        Err(e) => warn!("   ⚠️ Failed to export stats: {}", e),
    }

    info!("👋 SithWash API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════════════════════╗
    ║                                                              ║
    ║                 🧿  S I T H W A S H                          ║
    ║                                                              ║
    ║           D A S H B O A R D   A P I   v{:<8}              ║
    ║        Heuristic AML Transaction Fraud Scoring               ║
    ║                                                              ║
    ╚══════════════════════════════════════════════════════════════╝
    "#,
        APP_VERSION
    );
}
