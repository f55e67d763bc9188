//! Placeholder field generation
//!
//! The free tiers of the flight-data APIs do not expose booking references,
//! seats, or boarding zones, so the client mappers fill them with plausible
//! placeholders. Generation sits behind a trait so tests can inject fixed
//! values instead of randomness.

use rand::Rng;

/// Source of placeholder booking fields
pub trait PlaceholderSource: Send + Sync {
    /// 6-character uppercase alphanumeric booking reference
    fn pnr(&self) -> String;
    /// Seat designator, row 1-30 + letter A-F
    fn seat(&self) -> String;
    /// Boarding zone, 1-4
    fn zone(&self) -> String;
}

/// Default generator backed by the thread-local RNG
#[derive(Debug, Default)]
pub struct RandomPlaceholders;

const PNR_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SEAT_LETTERS: &[u8] = b"ABCDEF";

impl PlaceholderSource for RandomPlaceholders {
    fn pnr(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..6)
            .map(|_| PNR_ALPHABET[rng.gen_range(0..PNR_ALPHABET.len())] as char)
            .collect()
    }

    fn seat(&self) -> String {
        let mut rng = rand::thread_rng();
        let row = rng.gen_range(1..=30);
        let letter = SEAT_LETTERS[rng.gen_range(0..SEAT_LETTERS.len())] as char;
        format!("{}{}", row, letter)
    }

    fn zone(&self) -> String {
        rand::thread_rng().gen_range(1..=4).to_string()
    }
}

/// Deterministic generator for tests
#[derive(Debug)]
pub struct FixedPlaceholders {
    pub pnr: &'static str,
    pub seat: &'static str,
    pub zone: &'static str,
}

impl Default for FixedPlaceholders {
    fn default() -> Self {
        Self {
            pnr: "FIXPNR",
            seat: "14C",
            zone: "2",
        }
    }
}

impl PlaceholderSource for FixedPlaceholders {
    fn pnr(&self) -> String {
        self.pnr.to_string()
    }

    fn seat(&self) -> String {
        self.seat.to_string()
    }

    fn zone(&self) -> String {
        self.zone.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_pnr_shape() {
        let pnr = RandomPlaceholders.pnr();
        assert_eq!(pnr.len(), 6);
        assert!(pnr.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_random_seat_shape() {
        let seat = RandomPlaceholders.seat();
        let (row, letter) = seat.split_at(seat.len() - 1);
        let row: u32 = row.parse().unwrap();
        assert!((1..=30).contains(&row));
        assert!("ABCDEF".contains(letter));
    }

    #[test]
    fn test_random_zone_range() {
        let zone: u32 = RandomPlaceholders.zone().parse().unwrap();
        assert!((1..=4).contains(&zone));
    }
}
