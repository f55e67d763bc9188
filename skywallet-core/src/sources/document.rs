//! Document text normalizer
//!
//! Extracts flight-identifying fields from the flat text of an imported
//! ticket (PDF extraction itself is an external collaborator that hands this
//! module the concatenated page texts). Extraction is an ordered cascade of
//! pattern attempts per field, first success wins; this is heuristic by
//! design and highly dependent on airline document formats.
//!
//! The flight number is the only mandatory field: a document with no
//! recognizable flight number cannot produce an itinerary. Everything else
//! degrades to a sentinel.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use skywallet_common::model::{self, CabinClass, FlightStatus, Itinerary, Leg};
use skywallet_common::time;
use tracing::{info, warn};
use uuid::Uuid;

// Booking reference: labeled patterns first, then a bare 6-character run.
// The bare fallback can match spurious uppercase runs elsewhere in the text;
// that imprecision is accepted, the labeled patterns win when present.
static PNR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)PNR:?\s*([A-Z0-9]{5,8})").unwrap(),
        Regex::new(r"(?i)Booking Ref:?\s*([A-Z0-9]{5,8})").unwrap(),
        Regex::new(r"(?i)Reference:?\s*([A-Z0-9]{5,8})").unwrap(),
        Regex::new(r"([A-Z0-9]{6})").unwrap(),
    ]
});

// Carrier designator (2 letters, or 2 alphanumerics) + 3-4 digit number
static FLIGHT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]{2}|[A-Z0-9]{2})\s?(\d{3,4})").unwrap());

static SEAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Seat:?\s*([0-9]{1,2}[A-Z])").unwrap());

static DATE_NAMED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})\s?(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s?(\d{2,4})?")
        .unwrap()
});
static DATE_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{2,4})").unwrap());
static DATE_ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap());

static PASSENGER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)Passenger:?\s*([A-Z\s]+)").unwrap(),
        Regex::new(r"(?i)Name:?\s*([A-Z\s]+)").unwrap(),
    ]
});

/// Join per-page extracted texts the way the legacy extractor did: page order,
/// separated (and trailed) by a single space.
pub fn join_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page);
        text.push(' ');
    }
    text
}

/// Extract an itinerary from document text.
///
/// Returns `None` only when no flight-number pattern matches; every other
/// missing field falls back to its documented sentinel. Airport codes,
/// terminal, gate, and cabin are not recoverable from this source.
pub fn parse_document_text(text: &str) -> Option<Itinerary> {
    let flight = match FLIGHT_PATTERN.captures(text) {
        Some(captures) => format!("{} {}", &captures[1], &captures[2]),
        None => {
            warn!("Document import rejected: no flight number found");
            return None;
        }
    };

    let pnr = PNR_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|captures| captures[1].to_string())
        .unwrap_or_else(|| "PDF-IMP".to_string());

    let seat = SEAT_PATTERN
        .captures(text)
        .map(|captures| captures[1].to_uppercase())
        .unwrap_or_else(|| model::SEAT_ANY.to_string());

    let passenger = PASSENGER_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|captures| captures[1].trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Guest".to_string());

    let departure_time = extract_date(text).unwrap_or_else(time::now);
    let arrival_time = departure_time + chrono::Duration::hours(model::SYNTHETIC_DURATION_HOURS);

    let itinerary = Itinerary {
        id: format!("pdf-{}", Uuid::new_v4()),
        pnr,
        airline: "Imported".to_string(),
        flight_number: flight,
        departure: Leg::new(
            model::AIRPORT_UNKNOWN,
            "Unknown",
            model::TBD,
            Some(model::TBD.to_string()),
            departure_time,
        ),
        arrival: Leg::new(model::AIRPORT_UNKNOWN, "Unknown", model::TBD, None, arrival_time),
        seat,
        zone: "1".to_string(),
        class_label: "Economy".to_string(),
        class_type: CabinClass::Economy,
        airplane: "Unknown".to_string(),
        status: FlightStatus::Scheduled,
        loyalty: None,
        passenger,
        brand_gradient: "from-indigo-600 to-indigo-900".to_string(),
        logo: "📄".to_string(),
    };

    info!(
        flight = %itinerary.flight_number,
        pnr = %itinerary.pnr,
        "Extracted itinerary from document text"
    );

    Some(itinerary)
}

/// First date pattern that both matches and parses; `None` otherwise.
///
/// Dates carry no time of day; noon UTC keeps the calendar date stable
/// across nearby timezone offsets.
fn extract_date(text: &str) -> Option<DateTime<Utc>> {
    if let Some(captures) = DATE_NAMED.captures(text) {
        let day: u32 = captures[1].parse().ok()?;
        let month = month_number(&captures[2])?;
        let year = match captures.get(3).map(|m| m.as_str().parse::<i32>()) {
            Some(Ok(y)) if y < 100 => 2000 + y,
            Some(Ok(y)) => y,
            _ => time::now().year(),
        };
        return Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single();
    }

    if let Some(captures) = DATE_SLASH.captures(text) {
        let day: u32 = captures[1].parse().ok()?;
        let month: u32 = captures[2].parse().ok()?;
        let year: i32 = captures[3].parse().ok()?;
        let year = if year < 100 { 2000 + year } else { year };
        return Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single();
    }

    if let Some(captures) = DATE_ISO.captures(text) {
        let year: i32 = captures[1].parse().ok()?;
        let month: u32 = captures[2].parse().ok()?;
        let day: u32 = captures[3].parse().ok()?;
        return Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single();
    }

    None
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const TICKET: &str = "Boarding Pass  Flight BA 1234  PNR: QX7Z9K  Seat: 12a \
        Date 14 Mar 2026  Passenger: JANE SMITH";

    #[test]
    fn test_full_ticket_extraction() {
        let it = parse_document_text(TICKET).unwrap();
        assert_eq!(it.flight_number, "BA 1234");
        assert_eq!(it.pnr, "QX7Z9K");
        assert_eq!(it.seat, "12A");
        assert_eq!(it.passenger, "JANE SMITH");
        assert_eq!(it.departure.code, model::AIRPORT_UNKNOWN);
        assert_eq!(it.class_type, CabinClass::Economy);
    }

    #[test]
    fn test_no_flight_number_rejects_document() {
        // Plenty of extractable fields, but nothing shaped like a flight number
        let text = "Passenger: JOHN DOE PNR: ABCDE Seat: 3B hotel voucher";
        assert!(parse_document_text(text).is_none());
    }

    #[test]
    fn test_missing_fields_fall_back_to_sentinels() {
        let it = parse_document_text("your flight LH 440 awaits").unwrap();
        assert_eq!(it.seat, model::SEAT_ANY);
        assert_eq!(it.passenger, "Guest");
        // No labeled PNR and no bare 6-char run in this text
        assert_eq!(it.pnr, "PDF-IMP");
    }

    #[test]
    fn test_bare_six_char_run_used_as_pnr_fallback() {
        let it = parse_document_text("ref X9Y8Z7 flight DL 245").unwrap();
        assert_eq!(it.pnr, "X9Y8Z7");
    }

    #[test]
    fn test_arrival_is_departure_plus_two_hours() {
        let it = parse_document_text(TICKET).unwrap();
        assert_eq!(it.arrival.time - it.departure.time, Duration::hours(2));
    }

    #[test]
    fn test_named_month_date() {
        let it = parse_document_text("EK 202 on 5 Oct 2026").unwrap();
        let d = it.departure.time;
        assert_eq!((d.year(), d.month(), d.day()), (2026, 10, 5));
    }

    #[test]
    fn test_slash_date_is_day_first() {
        let it = parse_document_text("UA 883 travel 03/07/2026").unwrap();
        let d = it.departure.time;
        assert_eq!((d.year(), d.month(), d.day()), (2026, 7, 3));
    }

    #[test]
    fn test_iso_date() {
        let it = parse_document_text("flight QF 002 2026-11-30 departure").unwrap();
        let d = it.departure.time;
        assert_eq!((d.year(), d.month(), d.day()), (2026, 11, 30));
    }

    #[test]
    fn test_unparsable_date_falls_back_to_now() {
        // Matches the slash pattern but is not a real date
        let before = Utc::now();
        let it = parse_document_text("flight AA 100 on 31/13/2026").unwrap();
        assert!(it.departure.time >= before);
        assert!(it.departure.time <= Utc::now());
    }

    #[test]
    fn test_join_pages_space_separated() {
        let pages = vec!["page one".to_string(), "page two".to_string()];
        assert_eq!(join_pages(&pages), "page one page two ");
    }

    #[test]
    fn test_fresh_id_per_import() {
        let a = parse_document_text(TICKET).unwrap();
        let b = parse_document_text(TICKET).unwrap();
        assert_ne!(a.id, b.id);
    }
}
