//! Travel-distribution (Amadeus-style) booking client
//!
//! Resolves a booking reference to a canonical itinerary and offers a
//! schedule lookup for status refreshes. All calls authenticate with an
//! OAuth2 client-credentials bearer token held in a process-wide cache; the
//! cache lock is held across a refresh so concurrent callers coalesce onto
//! one authentication request instead of racing to overwrite each other.
//!
//! Known limitation, preserved on purpose: the distribution API's cabin
//! vocabulary is richer than the wallet's three-way classification, and is
//! not reverse-mapped; a resolved booking always carries the economy tag
//! even when the label says otherwise.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use skywallet_common::model::{self, CabinClass, FlightStatus, Itinerary, Leg};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clients::parse_instant;
use crate::placeholder::{PlaceholderSource, RandomPlaceholders};

const AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";
const USER_AGENT: &str = "SkyWallet/0.1.0 (https://github.com/skywallet/skywallet)";

/// Safety margin subtracted from the server-reported token lifetime, against
/// clock skew and in-flight request latency.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

// --- flight-order response (the fields we read) ---

#[derive(Debug, Deserialize)]
struct FlightOrderResponse {
    data: FlightOrder,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightOrder {
    #[serde(default)]
    flight_offers: Vec<FlightOffer>,
    #[serde(default)]
    travelers: Vec<Traveler>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightOffer {
    #[serde(default)]
    itineraries: Vec<OfferItinerary>,
    #[serde(default)]
    traveler_pricings: Vec<TravelerPricing>,
}

#[derive(Debug, Deserialize)]
struct OfferItinerary {
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Segment {
    id: Option<String>,
    departure: SegmentPoint,
    arrival: SegmentPoint,
    carrier_code: Option<String>,
    number: Option<String>,
    aircraft: Option<AircraftCode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SegmentPoint {
    iata_code: Option<String>,
    terminal: Option<String>,
    at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AircraftCode {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Traveler {
    name: Option<TravelerName>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TravelerName {
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TravelerPricing {
    #[serde(default)]
    fare_details_by_segment: Vec<FareDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FareDetails {
    segment_id: Option<String>,
    cabin: Option<String>,
}

// --- schedule response (the fields we read) ---

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(default)]
    data: Vec<DatedFlight>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatedFlight {
    #[serde(default)]
    flight_points: Vec<FlightPoint>,
    #[serde(default)]
    legs: Vec<ScheduleLeg>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlightPoint {
    iata_code: Option<String>,
    departure: Option<PointTimings>,
    arrival: Option<PointTimings>,
}

#[derive(Debug, Deserialize)]
struct PointTimings {
    #[serde(default)]
    timings: Vec<Timing>,
}

#[derive(Debug, Deserialize)]
struct Timing {
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleLeg {
    aircraft_equipment: Option<AircraftEquipment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AircraftEquipment {
    aircraft_type: Option<String>,
}

/// Booking-retrieval client with cached client-credentials authentication
pub struct BookingClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
    placeholders: Box<dyn PlaceholderSource>,
    token_cache: Mutex<Option<CachedToken>>,
}

impl BookingClient {
    pub fn new(credentials: Option<(String, String)>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            base_url: AMADEUS_BASE_URL.to_string(),
            credentials,
            placeholders: Box::new(RandomPlaceholders),
            token_cache: Mutex::new(None),
        }
    }

    /// Point the client at a different endpoint (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Swap the placeholder source (tests inject fixed values)
    pub fn with_placeholders(mut self, placeholders: Box<dyn PlaceholderSource>) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Whether credentials are configured at all
    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Reuse-or-refresh bearer token accessor.
    ///
    /// Holding the cache lock across the refresh serializes concurrent
    /// callers: the second caller finds the fresh token instead of issuing a
    /// competing authentication request. Authentication failure yields
    /// `None`; it never propagates.
    async fn bearer_token(&self) -> Option<String> {
        let mut cache = self.token_cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if Utc::now() < cached.expires_at {
                return Some(cached.token.clone());
            }
        }

        let (client_id, client_secret) = self.credentials.as_ref()?;

        let url = format!("{}/v1/security/oauth2/token", self.base_url);
        debug!("Requesting distribution API access token");

        let response = self
            .http_client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ])
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(status = %response.status(), "Token request rejected");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Token request failed");
                return None;
            }
        };

        let token: TokenResponse = match response.json().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Token response unparsable");
                return None;
            }
        };

        let expires_at = Utc::now()
            + chrono::Duration::seconds((token.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0));
        *cache = Some(CachedToken {
            token: token.access_token.clone(),
            expires_at,
        });

        info!(expires_in = token.expires_in, "Distribution API token cached");
        Some(token.access_token)
    }

    /// Resolve a booking id to its headline segment.
    ///
    /// A record with zero flight offers is "no result" even when the HTTP
    /// call succeeded: an itinerary requires at least one priced offer with
    /// at least one segment.
    pub async fn fetch_booking(&self, booking_id: &str) -> Option<Itinerary> {
        let token = self.bearer_token().await?;

        let url = format!("{}/v1/booking/flight-orders/{}", self.base_url, booking_id);
        debug!(booking_id = %booking_id, "Fetching flight order");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            warn!(booking_id = %booking_id, status = %response.status(), "Flight order fetch failed");
            return None;
        }

        let order: FlightOrderResponse = response.json().await.ok()?;
        let itinerary = map_order(order.data, booking_id, self.placeholders.as_ref())?;

        info!(
            booking_id = %booking_id,
            flight = %itinerary.flight_number,
            "Resolved booking to itinerary"
        );
        Some(itinerary)
    }

    /// Schedule lookup for one flight on one date; `None` on any failure.
    pub async fn fetch_flight_status(
        &self,
        carrier_code: &str,
        number: &str,
        date: NaiveDate,
    ) -> Option<Itinerary> {
        let token = self.bearer_token().await?;

        let url = format!("{}/v2/schedule/flights", self.base_url);
        let date = date.to_string();
        debug!(carrier = %carrier_code, number = %number, date = %date, "Fetching flight schedule");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("carrierCode", carrier_code),
                ("flightNumber", number),
                ("scheduledDepartureDate", date.as_str()),
            ])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            warn!(carrier = %carrier_code, number = %number, status = %response.status(), "Schedule fetch failed");
            return None;
        }

        let schedule: ScheduleResponse = response.json().await.ok()?;
        let dated = schedule.data.into_iter().next()?;
        map_dated_flight(dated, carrier_code, number, self.placeholders.as_ref())
    }
}

/// Map the headline segment (first segment of first itinerary of first
/// offer) onto the canonical model. Multi-segment and multi-passenger
/// bookings are simplified to that segment and the first traveler.
fn map_order(
    order: FlightOrder,
    booking_id: &str,
    placeholders: &dyn PlaceholderSource,
) -> Option<Itinerary> {
    let offer = match order.flight_offers.first() {
        Some(offer) => offer,
        None => {
            warn!(booking_id = %booking_id, "Flight order carries no flight offers");
            return None;
        }
    };
    let segment = offer.itineraries.first()?.segments.first()?;

    let departure_time = parse_instant(segment.departure.at.as_deref())?;
    let arrival_time = parse_instant(segment.arrival.at.as_deref())
        .unwrap_or(departure_time + chrono::Duration::hours(model::SYNTHETIC_DURATION_HOURS));

    let carrier = segment.carrier_code.as_deref().unwrap_or("");
    let number = segment.number.as_deref().unwrap_or("");

    let passenger = order
        .travelers
        .first()
        .and_then(|t| t.name.as_ref())
        .map(|name| {
            format!(
                "{} {}",
                name.first_name.as_deref().unwrap_or(""),
                name.last_name.as_deref().unwrap_or("")
            )
            .trim()
            .to_string()
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "User".to_string());

    let class_label = offer
        .traveler_pricings
        .first()
        .and_then(|pricing| {
            pricing
                .fare_details_by_segment
                .iter()
                .find(|fare| fare.segment_id == segment.id || fare.segment_id.is_none())
        })
        .and_then(|fare| fare.cabin.as_deref())
        .map(title_case)
        .unwrap_or_else(|| "Economy".to_string());

    Some(Itinerary {
        id: format!("bk-{}", Uuid::new_v4()),
        pnr: booking_id.to_uppercase(),
        airline: carrier.to_string(),
        flight_number: format!("{} {}", carrier, number).trim().to_string(),
        departure: leg_from_point(&segment.departure, departure_time, true),
        arrival: leg_from_point(&segment.arrival, arrival_time, false),
        seat: placeholders.seat(),
        zone: "1".to_string(),
        class_label,
        // The richer cabin vocabulary is not reverse-mapped
        class_type: CabinClass::Economy,
        airplane: segment
            .aircraft
            .as_ref()
            .and_then(|a| a.code.as_deref())
            .unwrap_or("Unknown")
            .to_string(),
        status: FlightStatus::Confirmed,
        loyalty: None,
        passenger,
        brand_gradient: "from-sky-600 to-sky-900".to_string(),
        logo: "🏷️".to_string(),
    })
}

fn leg_from_point(point: &SegmentPoint, time: DateTime<Utc>, departure: bool) -> Leg {
    let code = point
        .iata_code
        .clone()
        .unwrap_or_else(|| model::AIRPORT_UNKNOWN.to_string());
    Leg::new(
        code.clone(),
        code,
        point.terminal.clone().unwrap_or_else(|| model::TBD.to_string()),
        if departure { Some(model::TBD.to_string()) } else { None },
        time,
    )
}

/// Map a schedule record onto the canonical model for a status refresh
fn map_dated_flight(
    dated: DatedFlight,
    carrier_code: &str,
    number: &str,
    placeholders: &dyn PlaceholderSource,
) -> Option<Itinerary> {
    let departure_point = dated.flight_points.iter().find(|p| p.departure.is_some())?;
    let arrival_point = dated.flight_points.iter().find(|p| p.arrival.is_some())?;

    let departure_time = first_timing(departure_point.departure.as_ref())?;
    let arrival_time = first_timing(arrival_point.arrival.as_ref())
        .unwrap_or(departure_time + chrono::Duration::hours(model::SYNTHETIC_DURATION_HOURS));

    let airplane = dated
        .legs
        .first()
        .and_then(|leg| leg.aircraft_equipment.as_ref())
        .and_then(|equipment| equipment.aircraft_type.as_deref())
        .unwrap_or("Unknown")
        .to_string();

    let departure_code = departure_point
        .iata_code
        .clone()
        .unwrap_or_else(|| model::AIRPORT_UNKNOWN.to_string());
    let arrival_code = arrival_point
        .iata_code
        .clone()
        .unwrap_or_else(|| model::AIRPORT_UNKNOWN.to_string());

    Some(Itinerary {
        id: format!("st-{}", Uuid::new_v4()),
        pnr: placeholders.pnr(),
        airline: carrier_code.to_string(),
        flight_number: format!("{} {}", carrier_code, number),
        departure: Leg::new(
            departure_code.clone(),
            departure_code,
            model::TBD,
            Some(model::TBD.to_string()),
            departure_time,
        ),
        arrival: Leg::new(arrival_code.clone(), arrival_code, model::TBD, None, arrival_time),
        seat: placeholders.seat(),
        zone: placeholders.zone(),
        class_label: "Economy".to_string(),
        class_type: CabinClass::Economy,
        airplane,
        status: FlightStatus::Scheduled,
        loyalty: None,
        passenger: "User".to_string(),
        brand_gradient: "from-blue-600 to-blue-900".to_string(),
        logo: "✈️".to_string(),
    })
}

fn first_timing(timings: Option<&PointTimings>) -> Option<DateTime<Utc>> {
    parse_instant(timings?.timings.first()?.value.as_deref())
}

fn title_case(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::FixedPlaceholders;

    fn order_json() -> serde_json::Value {
        serde_json::json!({
            "flightOffers": [{
                "itineraries": [{
                    "segments": [{
                        "id": "1",
                        "departure": {"iataCode": "MAD", "terminal": "4", "at": "2026-03-14T09:35:00"},
                        "arrival": {"iataCode": "CDG", "terminal": "2F", "at": "2026-03-14T11:40:00"},
                        "carrierCode": "IB",
                        "number": "3402",
                        "aircraft": {"code": "321"}
                    }]
                }],
                "travelerPricings": [{
                    "fareDetailsBySegment": [{"segmentId": "1", "cabin": "BUSINESS"}]
                }]
            }],
            "travelers": [{"name": {"firstName": "ADA", "lastName": "LOVELACE"}}]
        })
    }

    #[test]
    fn test_order_maps_headline_segment() {
        let order: FlightOrder = serde_json::from_value(order_json()).unwrap();
        let it = map_order(order, "ref123", &FixedPlaceholders::default()).unwrap();
        assert_eq!(it.pnr, "REF123");
        assert_eq!(it.flight_number, "IB 3402");
        assert_eq!(it.departure.code, "MAD");
        assert_eq!(it.departure.terminal, "4");
        assert_eq!(it.arrival.code, "CDG");
        assert_eq!(it.status, FlightStatus::Confirmed);
        assert_eq!(it.passenger, "ADA LOVELACE");
        assert_eq!(it.airplane, "321");
    }

    #[test]
    fn test_cabin_label_kept_but_class_tag_forced_economy() {
        let order: FlightOrder = serde_json::from_value(order_json()).unwrap();
        let it = map_order(order, "ref123", &FixedPlaceholders::default()).unwrap();
        assert_eq!(it.class_label, "Business");
        assert_eq!(it.class_type, CabinClass::Economy);
    }

    #[test]
    fn test_zero_offers_is_no_result() {
        let order: FlightOrder =
            serde_json::from_value(serde_json::json!({"flightOffers": []})).unwrap();
        assert!(map_order(order, "ref123", &FixedPlaceholders::default()).is_none());
    }

    #[test]
    fn test_missing_travelers_defaults_passenger() {
        let mut json = order_json();
        json.as_object_mut().unwrap().remove("travelers");
        let order: FlightOrder = serde_json::from_value(json).unwrap();
        let it = map_order(order, "ref123", &FixedPlaceholders::default()).unwrap();
        assert_eq!(it.passenger, "User");
    }

    #[test]
    fn test_missing_fare_details_defaults_economy_label() {
        let mut json = order_json();
        json["flightOffers"][0]
            .as_object_mut()
            .unwrap()
            .remove("travelerPricings");
        let order: FlightOrder = serde_json::from_value(json).unwrap();
        let it = map_order(order, "ref123", &FixedPlaceholders::default()).unwrap();
        assert_eq!(it.class_label, "Economy");
    }

    #[test]
    fn test_missing_arrival_time_synthesizes_two_hours() {
        let mut json = order_json();
        json["flightOffers"][0]["itineraries"][0]["segments"][0]["arrival"]
            .as_object_mut()
            .unwrap()
            .remove("at");
        let order: FlightOrder = serde_json::from_value(json).unwrap();
        let it = map_order(order, "ref123", &FixedPlaceholders::default()).unwrap();
        assert_eq!(it.arrival.time - it.departure.time, chrono::Duration::hours(2));
    }

    #[test]
    fn test_schedule_maps_flight_points() {
        let schedule: ScheduleResponse = serde_json::from_value(serde_json::json!({
            "data": [{
                "flightPoints": [
                    {"iataCode": "JFK", "departure": {"timings": [{"qualifier": "STD", "value": "2026-01-01T10:00-05:00"}]}},
                    {"iataCode": "LHR", "arrival": {"timings": [{"qualifier": "STA", "value": "2026-01-01T22:00:00Z"}]}}
                ],
                "legs": [{"aircraftEquipment": {"aircraftType": "77W"}}]
            }]
        }))
        .unwrap();
        let dated = schedule.data.into_iter().next().unwrap();
        let it = map_dated_flight(dated, "DL", "245", &FixedPlaceholders::default()).unwrap();
        assert_eq!(it.flight_number, "DL 245");
        assert_eq!(it.departure.code, "JFK");
        assert_eq!(it.arrival.code, "LHR");
        assert_eq!(it.airplane, "77W");
        assert!(it.arrival.time > it.departure.time);
    }

    #[tokio::test]
    async fn test_missing_credentials_yield_no_token_and_no_result() {
        let client = BookingClient::new(None);
        assert!(client.fetch_booking("abc").await.is_none());
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(client.fetch_flight_status("DL", "245", date).await.is_none());
    }
}
