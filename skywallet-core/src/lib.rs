//! skywallet library interface
//!
//! The boarding-pass/itinerary normalization pipeline: source-specific
//! normalizers (barcode scan, document text), flight-data and booking
//! clients, weather enrichment, and the wallet orchestrator that owns the
//! session's itinerary collection. A thin axum surface exposes the entry
//! points to an out-of-process UI.

pub mod api;
pub mod clients;
pub mod error;
pub mod placeholder;
pub mod sample;
pub mod sources;
pub mod wallet;

pub use crate::error::{ApiError, ApiResult};
pub use crate::wallet::{ViewFilter, Wallet};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The session's wallet; only its orchestrator mutates the collection
    pub wallet: Arc<RwLock<Wallet>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(wallet: Wallet) -> Self {
        Self {
            wallet: Arc::new(RwLock::new(wallet)),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::itinerary_routes())
        .merge(api::health_routes())
        .with_state(state)
        // Enable CORS for local access
        .layer(tower_http::cors::CorsLayer::permissive())
}
