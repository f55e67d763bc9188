//! Itinerary collection endpoints
//!
//! The four add/refresh entry points plus the filtered view. Normalizer
//! rejections surface as 422 with the reason; nothing here panics on user
//! input.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use skywallet_common::model::Itinerary;

use crate::error::{ApiError, ApiResult};
use crate::wallet::ViewFilter;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    view: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Raw decoded text from the capture source
    pub raw: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Per-page extracted text, in page order
    pub pages: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct QrResponse {
    pub qr: String,
}

/// GET /itineraries?view=upcoming|past
pub async fn list_itineraries(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> ApiResult<Json<Vec<Itinerary>>> {
    let filter = match query.view.as_deref() {
        None | Some("upcoming") => ViewFilter::Upcoming,
        Some("past") => ViewFilter::Past,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "Unknown view '{}' (expected 'upcoming' or 'past')",
                other
            )))
        }
    };

    let wallet = state.wallet.read().await;
    Ok(Json(wallet.view(filter)))
}

/// POST /itineraries/scan
pub async fn submit_scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> ApiResult<(StatusCode, Json<Itinerary>)> {
    let mut wallet = state.wallet.write().await;
    if wallet.submit_scan(&request.raw).await {
        let itinerary = wallet.itineraries()[0].clone();
        Ok((StatusCode::CREATED, Json(itinerary)))
    } else {
        Err(ApiError::Rejected(
            "Could not parse boarding pass. Please try again.".to_string(),
        ))
    }
}

/// POST /itineraries/import
pub async fn submit_document(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> ApiResult<(StatusCode, Json<Itinerary>)> {
    let mut wallet = state.wallet.write().await;
    if wallet.submit_document(&request.pages).await {
        let itinerary = wallet.itineraries()[0].clone();
        Ok((StatusCode::CREATED, Json(itinerary)))
    } else {
        Err(ApiError::Rejected(
            "Could not extract flight details from document.".to_string(),
        ))
    }
}

/// POST /itineraries/booking/{id}
pub async fn submit_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> ApiResult<(StatusCode, Json<Itinerary>)> {
    let mut wallet = state.wallet.write().await;
    if wallet.submit_booking_id(&booking_id).await {
        let itinerary = wallet.itineraries()[0].clone();
        Ok((StatusCode::CREATED, Json(itinerary)))
    } else {
        Err(ApiError::Rejected(format!(
            "No itinerary found for booking '{}'",
            booking_id
        )))
    }
}

/// POST /itineraries/{id}/refresh
pub async fn refresh_status(
    State(state): State<AppState>,
    Path(itinerary_id): Path<String>,
) -> ApiResult<Json<Itinerary>> {
    let mut wallet = state.wallet.write().await;
    if wallet.get(&itinerary_id).is_none() {
        return Err(ApiError::NotFound(format!(
            "No itinerary with id '{}'",
            itinerary_id
        )));
    }

    if wallet.refresh_status(&itinerary_id).await {
        // Refresh replaces in place, so the id still resolves
        let itinerary = wallet
            .get(&itinerary_id)
            .cloned()
            .ok_or_else(|| ApiError::Internal("Refreshed itinerary vanished".to_string()))?;
        Ok(Json(itinerary))
    } else {
        Err(ApiError::Rejected(
            "No status source had this flight.".to_string(),
        ))
    }
}

/// GET /itineraries/{id}/qr
pub async fn qr_payload(
    State(state): State<AppState>,
    Path(itinerary_id): Path<String>,
) -> ApiResult<Json<QrResponse>> {
    let wallet = state.wallet.read().await;
    let itinerary = wallet
        .get(&itinerary_id)
        .ok_or_else(|| ApiError::NotFound(format!("No itinerary with id '{}'", itinerary_id)))?;
    Ok(Json(QrResponse {
        qr: itinerary.qr_payload(),
    }))
}

/// Build itinerary routes
pub fn itinerary_routes() -> Router<AppState> {
    Router::new()
        .route("/itineraries", get(list_itineraries))
        .route("/itineraries/scan", post(submit_scan))
        .route("/itineraries/import", post(submit_document))
        .route("/itineraries/booking/:id", post(submit_booking))
        .route("/itineraries/:id/refresh", post(refresh_status))
        .route("/itineraries/:id/qr", get(qr_payload))
}
