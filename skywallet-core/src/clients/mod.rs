//! External HTTP API clients
//!
//! One client per consumed collaborator. Every public operation is total at
//! this boundary: unreachable hosts, missing credentials, malformed bodies,
//! and empty results all collapse to `None` (or a documented fallback
//! value), logged for diagnostics and never propagated upward.

pub mod aviation;
pub mod booking;
pub mod weather;

pub use aviation::AviationClient;
pub use booking::BookingClient;
pub use weather::WeatherClient;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parse the timestamp shapes the flight APIs emit: RFC 3339, offset without
/// seconds ("2026-01-01T10:00-05:00"), and naive local ("2026-03-14T09:35:00",
/// treated as UTC — timezone handling is best effort by design).
pub(crate) fn parse_instant(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z") {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&t));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let t = parse_instant(Some("2025-01-01T10:00:00+00:00")).unwrap();
        assert_eq!(t.to_rfc3339(), "2025-01-01T10:00:00+00:00");
    }

    #[test]
    fn test_parse_offset_without_seconds() {
        let t = parse_instant(Some("2026-01-01T10:00-05:00")).unwrap();
        assert_eq!(t.to_rfc3339(), "2026-01-01T15:00:00+00:00");
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let t = parse_instant(Some("2026-03-14T09:35:00")).unwrap();
        assert_eq!(t.to_rfc3339(), "2026-03-14T09:35:00+00:00");
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_instant(Some("tomorrow-ish")).is_none());
        assert!(parse_instant(None).is_none());
    }
}
