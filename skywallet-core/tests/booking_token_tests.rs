//! Booking client integration tests against a local mock of the
//! distribution API: token reuse, expiry, refresh coalescing, and the
//! zero-offer no-result rule.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use skywallet_core::clients::BookingClient;
use skywallet_core::placeholder::FixedPlaceholders;

#[derive(Clone)]
struct MockState {
    auth_calls: Arc<AtomicUsize>,
    order_calls: Arc<AtomicUsize>,
    /// Lifetime the mock reports for issued tokens
    expires_in: i64,
}

async fn token_endpoint(State(state): State<MockState>) -> Json<serde_json::Value> {
    let n = state.auth_calls.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({
        "access_token": format!("token-{}", n),
        "token_type": "Bearer",
        "expires_in": state.expires_in,
    }))
}

async fn order_endpoint(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    state.order_calls.fetch_add(1, Ordering::SeqCst);
    if id == "empty" {
        // HTTP success, but nothing priced on the order
        return Json(serde_json::json!({"data": {"flightOffers": []}}));
    }
    Json(serde_json::json!({
        "data": {
            "flightOffers": [{
                "itineraries": [{
                    "segments": [{
                        "id": "1",
                        "departure": {"iataCode": "MAD", "at": "2026-03-14T09:35:00"},
                        "arrival": {"iataCode": "CDG", "at": "2026-03-14T11:40:00"},
                        "carrierCode": "IB",
                        "number": "3402"
                    }]
                }]
            }],
            "travelers": [{"name": {"firstName": "ADA", "lastName": "LOVELACE"}}]
        }
    }))
}

/// Spin up the mock and hand back its base URL plus the call counters
async fn spawn_mock(expires_in: i64) -> (String, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let auth_calls = Arc::new(AtomicUsize::new(0));
    let order_calls = Arc::new(AtomicUsize::new(0));
    let state = MockState {
        auth_calls: auth_calls.clone(),
        order_calls: order_calls.clone(),
        expires_in,
    };

    let app = Router::new()
        .route("/v1/security/oauth2/token", post(token_endpoint))
        .route("/v1/booking/flight-orders/:id", get(order_endpoint))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), auth_calls, order_calls)
}

fn client_for(base_url: &str) -> BookingClient {
    BookingClient::new(Some(("client-id".to_string(), "client-secret".to_string())))
        .with_base_url(base_url)
        .with_placeholders(Box::new(FixedPlaceholders::default()))
}

#[tokio::test]
async fn test_token_reused_within_validity_window() {
    let (base_url, auth_calls, order_calls) = spawn_mock(3600).await;
    let client = client_for(&base_url);

    assert!(client.fetch_booking("abc123").await.is_some());
    assert!(client.fetch_booking("abc123").await.is_some());

    // Two authenticated calls, one token fetch
    assert_eq!(auth_calls.load(Ordering::SeqCst), 1);
    assert_eq!(order_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_expired_token_refreshed_once() {
    // Reported lifetime under the 60s safety margin, so the cached token is
    // already expired when the second call checks it
    let (base_url, auth_calls, _) = spawn_mock(30).await;
    let client = client_for(&base_url);

    assert!(client.fetch_booking("abc123").await.is_some());
    assert!(client.fetch_booking("abc123").await.is_some());

    assert_eq!(auth_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_callers_coalesce_on_one_auth_call() {
    let (base_url, auth_calls, _) = spawn_mock(3600).await;
    let client = client_for(&base_url);

    let (a, b) = tokio::join!(client.fetch_booking("abc123"), client.fetch_booking("abc123"));
    assert!(a.is_some());
    assert!(b.is_some());

    assert_eq!(auth_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_zero_offer_order_is_no_result_despite_http_success() {
    let (base_url, _, order_calls) = spawn_mock(3600).await;
    let client = client_for(&base_url);

    assert!(client.fetch_booking("empty").await.is_none());
    // The order endpoint was actually reached; emptiness is what rejected it
    assert_eq!(order_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_resolved_booking_maps_headline_segment() {
    let (base_url, _, _) = spawn_mock(3600).await;
    let client = client_for(&base_url);

    let itinerary = client.fetch_booking("abc123").await.unwrap();
    assert_eq!(itinerary.pnr, "ABC123");
    assert_eq!(itinerary.flight_number, "IB 3402");
    assert_eq!(itinerary.departure.code, "MAD");
    assert_eq!(itinerary.arrival.code, "CDG");
    assert_eq!(itinerary.passenger, "ADA LOVELACE");
}
