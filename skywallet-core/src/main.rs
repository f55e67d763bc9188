//! skywallet - Travel Wallet Service
//!
//! Normalizes boarding passes and itineraries from heterogeneous sources
//! (barcode scans, document imports, flight-data and booking APIs) into one
//! canonical collection, enriched with per-city weather, and serves it over
//! HTTP for the mobile UI.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use skywallet_common::config::WalletConfig;
use skywallet_core::{build_router, AppState, Wallet};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting skywallet (Travel Wallet) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = WalletConfig::load();
    let mut wallet = Wallet::new(&config);

    // Initial load: flight batch plus weather enrichment; degrades to the
    // bundled samples when no credentials are configured.
    wallet.load().await;

    let state = AppState::new(wallet);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:5717").await?;
    info!("Listening on http://127.0.0.1:5717");
    info!("Health check: http://127.0.0.1:5717/health");

    axum::serve(listener, app).await?;

    Ok(())
}
