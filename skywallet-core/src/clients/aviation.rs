//! AviationStack flight-data client
//!
//! Fetches a small batch of currently-active flights and maps each record to
//! the canonical itinerary. When the API is unconfigured, unreachable, or
//! returns nothing, the bundled sample set stands in; that fallback is
//! silent from the caller's perspective and logged for diagnostics only.
//!
//! The free tier exposes no booking reference, seat, or zone, so those come
//! from the injected placeholder source.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use skywallet_common::model::{self, CabinClass, FlightStatus, Itinerary, Leg};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::clients::parse_instant;
use crate::placeholder::{PlaceholderSource, RandomPlaceholders};
use crate::sample::sample_itineraries;

const AVIATIONSTACK_BASE_URL: &str = "http://api.aviationstack.com/v1";
const USER_AGENT: &str = "SkyWallet/0.1.0 (https://github.com/skywallet/skywallet)";
const ACTIVE_FLIGHT_LIMIT: u32 = 5;

/// AviationStack flights response (the fields we read)
#[derive(Debug, Deserialize)]
struct FlightsResponse {
    data: Option<Vec<FlightRecord>>,
}

#[derive(Debug, Deserialize)]
pub struct FlightRecord {
    flight: FlightIdent,
    airline: AirlineIdent,
    departure: EndpointRecord,
    arrival: EndpointRecord,
    flight_status: Option<String>,
    aircraft: Option<AircraftIdent>,
}

#[derive(Debug, Deserialize)]
struct FlightIdent {
    iata: Option<String>,
    number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirlineIdent {
    name: Option<String>,
    iata: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EndpointRecord {
    iata: Option<String>,
    airport: Option<String>,
    terminal: Option<String>,
    gate: Option<String>,
    scheduled: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AircraftIdent {
    iata: Option<String>,
}

/// Flight-status aviation API client with sample-data fallback
pub struct AviationClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    placeholders: Box<dyn PlaceholderSource>,
}

impl AviationClient {
    pub fn new(api_key: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            base_url: AVIATIONSTACK_BASE_URL.to_string(),
            api_key,
            placeholders: Box::new(RandomPlaceholders),
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

    /// Fetch the active-flight batch, or the bundled samples on any
    /// degradation (unconfigured, unreachable, empty result).
    pub async fn fetch_flights(&self) -> Vec<Itinerary> {
        let Some(api_key) = &self.api_key else {
            warn!("AviationStack API key missing; using sample itineraries");
            return sample_itineraries();
        };

        let url = format!("{}/flights", self.base_url);
        debug!(url = %url, "Querying AviationStack for active flights");

        let limit = ACTIVE_FLIGHT_LIMIT.to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("access_key", api_key.as_str()),
                ("flight_status", "active"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(status = %response.status(), "Flight fetch failed; using sample itineraries");
                return sample_itineraries();
            }
            Err(e) => {
                warn!(error = %e, "Flight fetch failed; using sample itineraries");
                return sample_itineraries();
            }
        };

        let body: FlightsResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Flight response unparsable; using sample itineraries");
                return sample_itineraries();
            }
        };

        let records = body.data.unwrap_or_default();
        if records.is_empty() {
            warn!("No flights returned from API; using sample itineraries");
            return sample_itineraries();
        }

        let itineraries: Vec<Itinerary> = records
            .into_iter()
            .filter_map(|record| map_flight(record, self.placeholders.as_ref()))
            .collect();

        if itineraries.is_empty() {
            warn!("No mappable flights in API response; using sample itineraries");
            return sample_itineraries();
        }

        itineraries
    }

    /// Query one specific flight for a status refresh. Any failure is `None`.
    pub async fn fetch_flight(
        &self,
        carrier_iata: &str,
        number: &str,
        date: NaiveDate,
    ) -> Option<Itinerary> {
        let api_key = self.api_key.as_ref()?;

        let url = format!("{}/flights", self.base_url);
        let flight_iata = format!("{}{}", carrier_iata, number);
        let flight_date = date.to_string();
        debug!(flight = %flight_iata, date = %flight_date, "Querying AviationStack for one flight");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("access_key", api_key.as_str()),
                ("flight_iata", flight_iata.as_str()),
                ("flight_date", flight_date.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            warn!(status = %response.status(), flight = %flight_iata, "Single-flight lookup failed");
            return None;
        }

        let body: FlightsResponse = response.json().await.ok()?;
        let record = body.data.unwrap_or_default().into_iter().next()?;
        map_flight(record, self.placeholders.as_ref())
    }
}

/// Map one API flight record to the canonical model.
///
/// A record without a parsable departure time cannot anchor an itinerary and
/// is dropped; a missing arrival time falls back to departure + 2h.
pub fn map_flight(record: FlightRecord, placeholders: &dyn PlaceholderSource) -> Option<Itinerary> {
    let departure_time = parse_instant(record.departure.scheduled.as_deref())?;
    let arrival_time = parse_instant(record.arrival.scheduled.as_deref())
        .unwrap_or(departure_time + chrono::Duration::hours(model::SYNTHETIC_DURATION_HOURS));

    let airline_name = record.airline.name.unwrap_or_else(|| "Unknown".to_string());
    let flight_number = format!(
        "{} {}",
        record.airline.iata.as_deref().unwrap_or(""),
        record.flight.number.as_deref().unwrap_or("")
    )
    .trim()
    .to_string();

    let status = match record.flight_status.as_deref() {
        Some("active") => FlightStatus::Boarding,
        _ => FlightStatus::Scheduled,
    };

    Some(Itinerary {
        id: record
            .flight
            .iata
            .unwrap_or_else(|| format!("fl-{}", Uuid::new_v4())),
        pnr: placeholders.pnr(),
        airline: airline_name,
        flight_number,
        departure: leg_from_endpoint(record.departure, departure_time, true),
        arrival: leg_from_endpoint(record.arrival, arrival_time, false),
        seat: placeholders.seat(),
        zone: placeholders.zone(),
        class_label: "Economy".to_string(),
        class_type: CabinClass::Economy,
        airplane: record
            .aircraft
            .and_then(|a| a.iata)
            .unwrap_or_else(|| "Boeing 737".to_string()),
        status,
        loyalty: Some("Frequent Flyer".to_string()),
        passenger: "User".to_string(),
        brand_gradient: "from-blue-600 to-blue-900".to_string(),
        logo: "✈️".to_string(),
    })
}

fn leg_from_endpoint(endpoint: EndpointRecord, time: DateTime<Utc>, departure: bool) -> Leg {
    // A proper city lookup is unavailable on this tier; the airport display
    // name stands in for the city.
    let city = endpoint.airport.unwrap_or_else(|| "Unknown".to_string());
    Leg::new(
        endpoint.iata.unwrap_or_else(|| model::AIRPORT_UNKNOWN.to_string()),
        city,
        endpoint.terminal.unwrap_or_else(|| model::TBD.to_string()),
        if departure {
            Some(endpoint.gate.unwrap_or_else(|| model::TBD.to_string()))
        } else {
            None
        },
        time,
    )
}
