//! Source-specific normalizers
//!
//! Each submodule converts one raw source payload into the canonical
//! [`Itinerary`](skywallet_common::Itinerary). Every normalizer is total:
//! malformed input yields `None`, never a panic or error.

pub mod bcbp;
pub mod document;

pub use bcbp::parse_boarding_pass;
pub use document::{join_pages, parse_document_text};
