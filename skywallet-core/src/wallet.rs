//! Wallet orchestrator
//!
//! Owns the in-memory itinerary collection for the session and sequences
//! fetch → enrich → merge → sort. The collection is mutated only here, and
//! only by prepend, in-place refresh, or full replace; add-flows reject
//! without touching it when a normalizer returns nothing.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use skywallet_common::config::{configured_key, WalletConfig};
use skywallet_common::model::Itinerary;
use tracing::{info, warn};

use crate::clients::{AviationClient, BookingClient, WeatherClient};
use crate::sources;

/// Which partition of the collection a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFilter {
    Upcoming,
    Past,
}

// Carrier designator + flight number out of a display string, tolerating
// both "DL 245" and the scan format "AC0834"
static FLIGHT_DESIGNATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z0-9]{2})\s*0*(\d{1,4})").unwrap());

/// Session-scoped itinerary collection plus the clients that feed it
pub struct Wallet {
    aviation: AviationClient,
    booking: BookingClient,
    weather: WeatherClient,
    itineraries: Vec<Itinerary>,
}

impl Wallet {
    pub fn new(config: &WalletConfig) -> Self {
        let aviation = AviationClient::new(
            configured_key(&config.aviationstack_api_key).map(str::to_string),
        );
        let booking = BookingClient::new(
            config
                .amadeus_credentials()
                .map(|(id, secret)| (id.to_string(), secret.to_string())),
        );
        let weather =
            WeatherClient::new(configured_key(&config.openweather_api_key).map(str::to_string));
        Self::with_clients(aviation, booking, weather)
    }

    /// Assemble from pre-built clients (tests point these at mock endpoints)
    pub fn with_clients(
        aviation: AviationClient,
        booking: BookingClient,
        weather: WeatherClient,
    ) -> Self {
        Self {
            aviation,
            booking,
            weather,
            itineraries: Vec::new(),
        }
    }

    /// Initial load: fetch the flight batch, enrich every leg concurrently,
    /// publish the whole collection at once.
    pub async fn load(&mut self) {
        let fetched = self.aviation.fetch_flights().await;
        let weather = &self.weather;

        let enriched = futures::future::join_all(
            fetched
                .into_iter()
                .map(|itinerary| enrich(weather, itinerary)),
        )
        .await;

        info!(count = enriched.len(), "Itinerary collection loaded");
        self.itineraries = enriched;
    }

    /// Add a scanned boarding pass. `false` leaves the collection unchanged.
    pub async fn submit_scan(&mut self, raw: &str) -> bool {
        match sources::parse_boarding_pass(raw) {
            Some(itinerary) => {
                self.prepend(itinerary).await;
                true
            }
            None => {
                warn!("Scan rejected: payload did not decode as a boarding pass");
                false
            }
        }
    }

    /// Add an imported document from its per-page extracted texts
    pub async fn submit_document(&mut self, pages: &[String]) -> bool {
        let text = sources::join_pages(pages);
        match sources::parse_document_text(&text) {
            Some(itinerary) => {
                self.prepend(itinerary).await;
                true
            }
            None => {
                warn!("Document import rejected: no flight details extracted");
                false
            }
        }
    }

    /// Resolve a booking reference and add its headline segment
    pub async fn submit_booking_id(&mut self, booking_id: &str) -> bool {
        match self.booking.fetch_booking(booking_id).await {
            Some(itinerary) => {
                self.prepend(itinerary).await;
                true
            }
            None => {
                warn!(booking_id = %booking_id, "Booking lookup returned no itinerary");
                false
            }
        }
    }

    /// Refresh one itinerary's status from the live sources: distribution
    /// API first when configured, then the aviation API, then give up.
    /// Fixed order, one attempt per tier.
    pub async fn refresh_status(&mut self, itinerary_id: &str) -> bool {
        let Some(index) = self.itineraries.iter().position(|i| i.id == itinerary_id) else {
            warn!(itinerary_id = %itinerary_id, "Refresh requested for unknown itinerary");
            return false;
        };

        let current = &self.itineraries[index];
        let Some((carrier, number)) = split_flight_designator(&current.flight_number) else {
            warn!(flight = %current.flight_number, "Cannot parse flight designator for refresh");
            return false;
        };
        let date = current.departure.time.date_naive();

        let mut refreshed = None;
        if self.booking.is_configured() {
            refreshed = self.booking.fetch_flight_status(&carrier, &number, date).await;
        }
        if refreshed.is_none() {
            refreshed = self.aviation.fetch_flight(&carrier, &number, date).await;
        }

        let Some(update) = refreshed else {
            info!(itinerary_id = %itinerary_id, "No status source had this flight");
            return false;
        };

        let merged = merge_refresh(&self.itineraries[index], update);
        let merged = enrich(&self.weather, merged).await;
        self.itineraries[index] = merged;
        info!(itinerary_id = %itinerary_id, "Itinerary status refreshed");
        true
    }

    /// Filtered, sorted view: upcoming soonest-first, past most-recent-first
    pub fn view(&self, filter: ViewFilter) -> Vec<Itinerary> {
        view_of(&self.itineraries, filter, Utc::now())
    }

    /// All itineraries, newest insertion first (no filter)
    pub fn itineraries(&self) -> &[Itinerary] {
        &self.itineraries
    }

    /// Look one itinerary up by id
    pub fn get(&self, itinerary_id: &str) -> Option<&Itinerary> {
        self.itineraries.iter().find(|i| i.id == itinerary_id)
    }

    async fn prepend(&mut self, itinerary: Itinerary) {
        let itinerary = enrich(&self.weather, itinerary).await;
        self.itineraries.insert(0, itinerary);
    }
}

/// Enrich both legs of one itinerary. The two lookups run concurrently and
/// independently, but the itinerary is only handed back once both resolved,
/// so a partially-enriched record is never observable.
async fn enrich(weather: &WeatherClient, mut itinerary: Itinerary) -> Itinerary {
    let (departure, arrival) = futures::join!(
        weather.fetch_weather(&itinerary.departure.city),
        weather.fetch_weather(&itinerary.arrival.city),
    );
    itinerary.departure.apply_weather(departure);
    itinerary.arrival.apply_weather(arrival);
    itinerary
}

fn view_of(items: &[Itinerary], filter: ViewFilter, now: DateTime<Utc>) -> Vec<Itinerary> {
    let mut result: Vec<Itinerary> = items
        .iter()
        .filter(|i| match filter {
            ViewFilter::Upcoming => !i.is_past(now),
            ViewFilter::Past => i.is_past(now),
        })
        .cloned()
        .collect();

    match filter {
        ViewFilter::Upcoming => result.sort_by_key(|i| i.departure.time),
        ViewFilter::Past => result.sort_by_key(|i| std::cmp::Reverse(i.departure.time)),
    }
    result
}

/// Fold a freshly fetched record into the stored itinerary. Live sources
/// know nothing about the traveler, so identity and presentation fields
/// stay as stored; schedule, status and equipment come from the update.
fn merge_refresh(current: &Itinerary, update: Itinerary) -> Itinerary {
    Itinerary {
        departure: update.departure,
        arrival: update.arrival,
        status: update.status,
        airplane: update.airplane,
        ..current.clone()
    }
}

/// "DL 245" or "AC0834" → ("DL", "245") / ("AC", "834")
fn split_flight_designator(display: &str) -> Option<(String, String)> {
    let captures = FLIGHT_DESIGNATOR.captures(display)?;
    Some((captures[1].to_string(), captures[2].to_string()))
}
