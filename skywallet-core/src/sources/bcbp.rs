//! Barcode record normalizer
//!
//! Best-effort mapper for IATA bar-coded boarding passes (BCBP "M" type
//! format). This is not a full standard decoder: it reads the fixed-offset
//! mandatory items of the first leg, scans the conditional section for a
//! frequent-flyer number, and tolerates everything else being absent. Any
//! payload that does not fit the grammar yields `None`, never an error.

use chrono::Datelike;
use skywallet_common::model::{self, CabinClass, FlightStatus, Itinerary, Leg};
use skywallet_common::time;
use tracing::{debug, info};
use uuid::Uuid;

// Mandatory-item offsets (IATA Resolution 792). The header is 23 characters,
// the first leg's mandatory block runs to offset 60.
const FORMAT_CODE: usize = 0;
const LEG_COUNT: usize = 1;
const PASSENGER_NAME: std::ops::Range<usize> = 2..22;
const PNR: std::ops::Range<usize> = 23..30;
const FROM_AIRPORT: std::ops::Range<usize> = 30..33;
const TO_AIRPORT: std::ops::Range<usize> = 33..36;
const CARRIER: std::ops::Range<usize> = 36..39;
const FLIGHT_NUMBER: std::ops::Range<usize> = 39..44;
const DAY_OF_YEAR: std::ops::Range<usize> = 44..47;
const COMPARTMENT: std::ops::Range<usize> = 47..48;
const SEAT: std::ops::Range<usize> = 48..52;
const CONDITIONAL_SIZE: std::ops::Range<usize> = 58..60;
const MANDATORY_LEG_END: usize = 60;

/// Decode a scanned payload into a canonical itinerary.
///
/// Multi-leg records are simplified to their first segment. Returns `None`
/// when the payload does not decode under the grammar or carries zero legs.
pub fn parse_boarding_pass(raw: &str) -> Option<Itinerary> {
    if raw.get(FORMAT_CODE..FORMAT_CODE + 1) != Some("M") {
        debug!("Rejecting barcode payload: not an M-type BCBP record");
        return None;
    }

    let legs: u32 = raw.get(LEG_COUNT..LEG_COUNT + 1)?.parse().ok()?;
    if legs == 0 {
        debug!("Rejecting barcode payload: zero legs");
        return None;
    }

    // Mandatory items of the first leg; a short payload fails here.
    let pnr = field(raw, PNR)?;
    let origin = field(raw, FROM_AIRPORT)?;
    let destination = field(raw, TO_AIRPORT)?;
    let carrier = field(raw, CARRIER)?;
    let flight_number = field(raw, FLIGHT_NUMBER)?;
    let compartment = raw.get(COMPARTMENT)?;
    let seat = field(raw, SEAT)?;

    // The grammar encodes only a day-of-year; resolve against the current
    // calendar year, falling back to "now" when non-numeric.
    let departure_time = match raw.get(DAY_OF_YEAR).and_then(|d| d.trim().parse::<u32>().ok()) {
        Some(day) => time::day_of_year_to_date(time::now().year(), day),
        None => time::now(),
    };
    // Real duration is not recoverable from this source.
    let arrival_time = departure_time + chrono::Duration::hours(model::SYNTHETIC_DURATION_HOURS);

    let (class_label, class_type) = match compartment {
        "F" => ("First", CabinClass::First),
        "C" => ("Business", CabinClass::Premium),
        _ => ("Economy", CabinClass::Economy),
    };

    let passenger = field(raw, PASSENGER_NAME).unwrap_or("");
    let loyalty = frequent_flyer_number(raw).map(|n| format!("FF: {}", n));

    let airline = if carrier.is_empty() { "Unknown".to_string() } else { carrier.to_string() };

    let itinerary = Itinerary {
        id: format!("scan-{}", Uuid::new_v4()),
        pnr: if pnr.is_empty() { "SCAN".to_string() } else { pnr.to_string() },
        airline,
        flight_number: format!("{}{}", carrier, flight_number),
        departure: Leg::new(
            origin,
            origin,
            model::TBD,
            Some(model::TBD.to_string()),
            departure_time,
        ),
        arrival: Leg::new(destination, destination, model::TBD, None, arrival_time),
        seat: if seat.is_empty() { model::SEAT_ANY.to_string() } else { seat.to_string() },
        zone: "1".to_string(),
        class_label: class_label.to_string(),
        class_type,
        airplane: "Unknown".to_string(),
        status: FlightStatus::Scheduled,
        loyalty,
        passenger: if passenger.is_empty() { "Passenger".to_string() } else { passenger.to_string() },
        brand_gradient: "from-gray-700 to-gray-900".to_string(),
        logo: "🎫".to_string(),
    };

    info!(
        flight = %itinerary.flight_number,
        pnr = %itinerary.pnr,
        "Decoded boarding pass from barcode scan"
    );

    Some(itinerary)
}

/// Trimmed fixed-offset field; `None` only when the payload is too short
fn field(raw: &str, range: std::ops::Range<usize>) -> Option<&str> {
    raw.get(range).map(str::trim)
}

/// Best-effort scan of the conditional section for a frequent-flyer number.
///
/// Walks the versioned structure: '>' indicator, version, the size-prefixed
/// unique block, then the size-prefixed repeated block whose frequent-flyer
/// number sits at offset 21. Absence at any step simply means no loyalty
/// info.
fn frequent_flyer_number(raw: &str) -> Option<String> {
    let conditional_len = usize::from_str_radix(raw.get(CONDITIONAL_SIZE)?.trim(), 16).ok()?;
    let conditional = raw.get(MANDATORY_LEG_END..MANDATORY_LEG_END + conditional_len)?;

    if !conditional.starts_with('>') {
        return None;
    }
    // '>' + version character, then the unique block preceded by its size
    let unique_len = usize::from_str_radix(conditional.get(2..4)?, 16).ok()?;
    let repeated = conditional.get(4 + unique_len..)?;

    let repeated_len = usize::from_str_radix(repeated.get(0..2)?, 16).ok()?;
    let repeated = repeated.get(2..2 + repeated_len)?;

    // airline numeric (3) + document serial (10) + selectee (1) +
    // international-document (1) + marketing carrier (3) + FF airline (3)
    let number = repeated.get(21..37.min(repeated.len()))?.trim();
    if number.is_empty() {
        None
    } else {
        Some(number.to_string())
    }
}
