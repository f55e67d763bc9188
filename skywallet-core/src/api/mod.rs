//! HTTP API handlers for skywallet

pub mod health;
pub mod itineraries;

pub use health::health_routes;
pub use itineraries::itinerary_routes;
