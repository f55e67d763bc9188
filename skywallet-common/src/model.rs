//! Canonical itinerary model
//!
//! The shared target schema every source normalizer converges to. One
//! `Itinerary` describes one flown segment; multi-leg journeys are simplified
//! to their headline segment by the normalizers, never here.
//!
//! Downstream consumers must treat the sentinel values ("TBD", "ANY", "UNK",
//! "Unknown", "--") as first-class valid states, not errors.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for an unassigned seat
pub const SEAT_ANY: &str = "ANY";
/// Sentinel for an unknown terminal or gate
pub const TBD: &str = "TBD";
/// Sentinel for an unknown airport code
pub const AIRPORT_UNKNOWN: &str = "UNK";
/// Sentinel temperature shown before weather enrichment has run
pub const TEMP_PENDING: &str = "--";

/// Synthetic flight duration used when a source cannot recover the real
/// arrival time (barcode and document sources encode no duration).
pub const SYNTHETIC_DURATION_HOURS: i64 = 2;

/// Closed cabin classification. `Premium` covers business and
/// premium-economy; the richer carrier vocabularies are not reverse-mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CabinClass {
    First,
    Premium,
    Economy,
}

/// Itinerary lifecycle status.
///
/// `Past` is terminal; everything else is refined into a live display string
/// by [`Itinerary::time_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightStatus {
    Scheduled,
    Boarding,
    Confirmed,
    Past,
}

/// Discrete weather category for a leg's city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherKind {
    Sun,
    Rain,
    Cloudy,
}

/// One enrichment result: category plus display temperature.
///
/// A leg's weather fields are only ever overwritten from one whole report;
/// partial application would violate the both-or-neither invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub weather: WeatherKind,
    pub temp: String,
}

/// Departure or arrival side of an itinerary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    /// IATA airport code, or "UNK" when the source cannot recover it
    pub code: String,
    /// City display name; falls back to the airport code or "Unknown"
    pub city: String,
    /// Terminal designator, "TBD" when unknown
    pub terminal: String,
    /// Gate designator (departure legs only), "TBD" when unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,
    /// Scheduled local instant, stored UTC
    pub time: DateTime<Utc>,
    /// Weather category, default `Sun` before enrichment
    pub weather: WeatherKind,
    /// Display temperature, sentinel "--" before enrichment
    pub temp: String,
}

impl Leg {
    /// Build a leg with weather fields at their pre-enrichment defaults
    pub fn new(
        code: impl Into<String>,
        city: impl Into<String>,
        terminal: impl Into<String>,
        gate: Option<String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            code: code.into(),
            city: city.into(),
            terminal: terminal.into(),
            gate,
            time,
            weather: WeatherKind::Sun,
            temp: TEMP_PENDING.to_string(),
        }
    }

    /// Overlay one whole enrichment result onto this leg
    pub fn apply_weather(&mut self, report: WeatherReport) {
        self.weather = report.weather;
        self.temp = report.temp;
    }
}

/// The canonical unit: one normalized flight segment.
///
/// Created exactly once, by exactly one normalizer, from exactly one source
/// event. Never mutated in place except for the weather overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Itinerary {
    /// Session-unique identifier, fresh per normalization call. Scanning the
    /// same pass twice yields two itineraries; dedup is out of scope.
    pub id: String,
    /// Booking reference, or a source sentinel ("SCAN", "PDF-IMP")
    pub pnr: String,
    /// Operating carrier display name
    pub airline: String,
    /// Combined carrier code + number display string, e.g. "DL 245"
    pub flight_number: String,
    pub departure: Leg,
    pub arrival: Leg,
    /// Seat designator, "ANY" when unassigned
    pub seat: String,
    /// Boarding zone designator
    pub zone: String,
    /// Cabin display label as the source reported it
    pub class_label: String,
    /// Closed classification of `class_label`
    pub class_type: CabinClass,
    /// Aircraft type label
    pub airplane: String,
    pub status: FlightStatus,
    /// Loyalty-program display string; `None` means no loyalty info
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loyalty: Option<String>,
    /// Passenger display name
    pub passenger: String,
    /// Presentation hint: gradient-style key, chosen by source-type default
    pub brand_gradient: String,
    /// Presentation hint: emoji/icon key, chosen by source-type default
    pub logo: String,
}

impl Itinerary {
    /// Whether this itinerary belongs in the "past" view: an explicit
    /// terminal status, or an arrival already behind us.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.status == FlightStatus::Past || self.arrival.time < now
    }

    /// Live status line for an upcoming card.
    ///
    /// "Boarding Now" while the status flag is Boarding; a countdown in
    /// days+hours (or hours+minutes under 24h) otherwise; "Departed" once the
    /// departure instant has passed without a terminal status.
    pub fn time_status(&self, now: DateTime<Utc>) -> String {
        if self.status == FlightStatus::Boarding {
            return "Boarding Now".to_string();
        }
        let diff = self.departure.time - now;
        if diff < Duration::zero() {
            return "Departed".to_string();
        }
        let hours_total = diff.num_hours();
        let mins = (diff - Duration::hours(hours_total)).num_minutes();
        if hours_total >= 24 {
            let days = hours_total / 24;
            let hours = hours_total % 24;
            format!("Departs in {}d {}h", days, hours)
        } else {
            format!("Departs in {}h {}m", hours_total, mins)
        }
    }

    /// Compact gate-QR payload: one-way serialization of the fields a gate
    /// reader needs. Never parsed back by this system.
    pub fn qr_payload(&self) -> String {
        serde_json::json!({
            "pnr": self.pnr,
            "flight": self.flight_number,
            "date": self.departure.time.to_rfc3339(),
            "seat": self.seat,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(dep_offset_h: i64, arr_offset_h: i64, status: FlightStatus) -> Itinerary {
        let now = Utc::now();
        Itinerary {
            id: "t1".to_string(),
            pnr: "H7K92M".to_string(),
            airline: "Delta Airlines".to_string(),
            flight_number: "DL 245".to_string(),
            departure: Leg::new(
                "JFK",
                "New York",
                "4",
                Some("B22".to_string()),
                now + Duration::hours(dep_offset_h),
            ),
            arrival: Leg::new("LHR", "London", "3", None, now + Duration::hours(arr_offset_h)),
            seat: "12A".to_string(),
            zone: "SKY".to_string(),
            class_label: "Business".to_string(),
            class_type: CabinClass::Premium,
            airplane: "Boeing 767-400".to_string(),
            status,
            loyalty: None,
            passenger: "John Doe".to_string(),
            brand_gradient: "from-rose-700 to-rose-900".to_string(),
            logo: "🔺".to_string(),
        }
    }

    #[test]
    fn test_future_departure_is_upcoming() {
        let it = sample(1, 9, FlightStatus::Scheduled);
        assert!(!it.is_past(Utc::now()));
    }

    #[test]
    fn test_past_arrival_is_past_without_terminal_status() {
        let it = sample(-9, -1, FlightStatus::Scheduled);
        assert!(it.is_past(Utc::now()));
    }

    #[test]
    fn test_terminal_status_is_past_regardless_of_timestamp() {
        let it = sample(1, 9, FlightStatus::Past);
        assert!(it.is_past(Utc::now()));
    }

    #[test]
    fn test_time_status_boarding_wins() {
        let it = sample(1, 9, FlightStatus::Boarding);
        assert_eq!(it.time_status(Utc::now()), "Boarding Now");
    }

    #[test]
    fn test_time_status_departed() {
        let it = sample(-1, 1, FlightStatus::Scheduled);
        assert_eq!(it.time_status(Utc::now()), "Departed");
    }

    #[test]
    fn test_time_status_under_24h_uses_hours_minutes() {
        let mut it = sample(0, 9, FlightStatus::Scheduled);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        it.departure.time = now + Duration::hours(3) + Duration::minutes(30);
        assert_eq!(it.time_status(now), "Departs in 3h 30m");
    }

    #[test]
    fn test_time_status_over_24h_uses_days_hours() {
        let mut it = sample(0, 9, FlightStatus::Scheduled);
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        it.departure.time = now + Duration::hours(50);
        assert_eq!(it.time_status(now), "Departs in 2d 2h");
    }

    #[test]
    fn test_qr_payload_fields() {
        let it = sample(1, 9, FlightStatus::Scheduled);
        let payload: serde_json::Value = serde_json::from_str(&it.qr_payload()).unwrap();
        assert_eq!(payload["pnr"], "H7K92M");
        assert_eq!(payload["flight"], "DL 245");
        assert_eq!(payload["seat"], "12A");
        assert!(payload["date"].is_string());
    }

    #[test]
    fn test_weather_overlay_sets_both_fields() {
        let mut leg = Leg::new("JFK", "New York", "4", None, Utc::now());
        assert_eq!(leg.temp, TEMP_PENDING);
        leg.apply_weather(WeatherReport {
            weather: WeatherKind::Rain,
            temp: "58°".to_string(),
        });
        assert_eq!(leg.weather, WeatherKind::Rain);
        assert_eq!(leg.temp, "58°");
    }

    #[test]
    fn test_cabin_class_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CabinClass::Premium).unwrap(), "\"premium\"");
        assert_eq!(serde_json::to_string(&WeatherKind::Cloudy).unwrap(), "\"cloudy\"");
    }
}
