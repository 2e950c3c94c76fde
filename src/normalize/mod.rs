//! Normalization of loosely-structured upstream data onto the canonical
//! output schemas. Every object leaving this layer is fully populated and
//! type-checked; callers never see a partially valid tree.

pub mod flights;
pub mod itinerary;

pub use flights::{normalize_flight_results, normalize_generated_flights};
pub use itinerary::normalize_itinerary;
