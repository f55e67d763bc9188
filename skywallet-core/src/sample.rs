//! Bundled sample itineraries
//!
//! Demo/offline fallback used when the flight-data API is unconfigured,
//! unreachable, or returns nothing. Three trips spanning the cabin classes,
//! with departure times relative to "now" so the upcoming view is never
//! empty on first launch.

use chrono::Duration;
use skywallet_common::model::{CabinClass, FlightStatus, Itinerary, Leg, WeatherKind, WeatherReport};
use skywallet_common::time;

/// The fixed demo set
pub fn sample_itineraries() -> Vec<Itinerary> {
    let now = time::now();

    let mut delta = Itinerary {
        id: "f1".to_string(),
        pnr: "H7K92M".to_string(),
        airline: "Delta Airlines".to_string(),
        flight_number: "DL 245".to_string(),
        departure: Leg::new(
            "JFK",
            "New York",
            "4",
            Some("B22".to_string()),
            now + Duration::minutes(50),
        ),
        arrival: Leg::new("LHR", "London", "3", None, now + Duration::hours(9)),
        seat: "12A".to_string(),
        zone: "SKY".to_string(),
        class_label: "Business".to_string(),
        class_type: CabinClass::Premium,
        airplane: "Boeing 767-400".to_string(),
        status: FlightStatus::Boarding,
        loyalty: Some("SkyMiles: 99887766".to_string()),
        passenger: "John Doe".to_string(),
        brand_gradient: "from-rose-700 to-rose-900".to_string(),
        logo: "🔺".to_string(),
    };
    delta.departure.apply_weather(WeatherReport {
        weather: WeatherKind::Rain,
        temp: "58°".to_string(),
    });
    delta.arrival.apply_weather(WeatherReport {
        weather: WeatherKind::Cloudy,
        temp: "52°".to_string(),
    });

    let mut united = Itinerary {
        id: "f2".to_string(),
        pnr: "UA8832".to_string(),
        airline: "United Airlines".to_string(),
        flight_number: "UA 883".to_string(),
        departure: Leg::new(
            "SFO",
            "San Francisco",
            "INT",
            Some("G4".to_string()),
            now + Duration::days(2),
        ),
        arrival: Leg::new("NRT", "Tokyo", "1", None, now + Duration::hours(55)),
        seat: "45C".to_string(),
        zone: "3".to_string(),
        class_label: "Economy".to_string(),
        class_type: CabinClass::Economy,
        airplane: "Boeing 787-9".to_string(),
        status: FlightStatus::Scheduled,
        loyalty: Some("MileagePlus: 112233".to_string()),
        passenger: "John Doe".to_string(),
        brand_gradient: "from-blue-600 to-blue-900".to_string(),
        logo: "🌐".to_string(),
    };
    united.departure.apply_weather(WeatherReport {
        weather: WeatherKind::Sun,
        temp: "72°".to_string(),
    });
    united.arrival.apply_weather(WeatherReport {
        weather: WeatherKind::Rain,
        temp: "65°".to_string(),
    });

    let mut emirates = Itinerary {
        id: "f3".to_string(),
        pnr: "EK202X".to_string(),
        airline: "Emirates".to_string(),
        flight_number: "EK 202".to_string(),
        departure: Leg::new(
            "JFK",
            "New York",
            "4",
            Some("A6".to_string()),
            now + Duration::days(30),
        ),
        arrival: Leg::new("DXB", "Dubai", "3", None, now + Duration::days(30) + Duration::hours(10)),
        seat: "2K".to_string(),
        zone: "1".to_string(),
        class_label: "First Class".to_string(),
        class_type: CabinClass::First,
        airplane: "Airbus A380".to_string(),
        status: FlightStatus::Scheduled,
        loyalty: Some("Skywards: Platinum".to_string()),
        passenger: "John Doe".to_string(),
        brand_gradient: "from-emerald-800 to-emerald-950".to_string(),
        logo: "🦅".to_string(),
    };
    emirates.departure.apply_weather(WeatherReport {
        weather: WeatherKind::Cloudy,
        temp: "45°".to_string(),
    });
    emirates.arrival.apply_weather(WeatherReport {
        weather: WeatherKind::Sun,
        temp: "88°".to_string(),
    });

    vec![delta, united, emirates]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_set_spans_cabin_classes() {
        let samples = sample_itineraries();
        assert_eq!(samples.len(), 3);
        let classes: Vec<CabinClass> = samples.iter().map(|s| s.class_type).collect();
        assert!(classes.contains(&CabinClass::First));
        assert!(classes.contains(&CabinClass::Premium));
        assert!(classes.contains(&CabinClass::Economy));
    }

    #[test]
    fn test_samples_are_all_upcoming() {
        let now = time::now();
        assert!(sample_itineraries().iter().all(|s| !s.is_past(now)));
    }

    #[test]
    fn test_sample_arrival_after_departure() {
        assert!(sample_itineraries().iter().all(|s| s.arrival.time >= s.departure.time));
    }
}
