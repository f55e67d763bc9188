//! # SkyWallet Common Library
//!
//! Shared code for the SkyWallet services including:
//! - Canonical itinerary model (the schema every source converges to)
//! - Error types
//! - Configuration loading
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod model;
pub mod time;

pub use error::{Error, Result};
pub use model::{CabinClass, FlightStatus, Itinerary, Leg, WeatherKind, WeatherReport};
