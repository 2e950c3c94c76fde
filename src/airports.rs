//! City to IATA-style airport code resolution.
//!
//! Known hubs resolve through a static table with no network traffic; the
//! aggregator is only consulted for cities the table misses.

use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::services::{search::ENGINE_FLIGHTS, SearchProvider};

/// Static city -> IATA code table for common hubs.
const AIRPORT_CODES: &[(&str, &str)] = &[
    ("mumbai", "BOM"),
    ("bangalore", "BLR"),
    ("delhi", "DEL"),
    ("chennai", "MAA"),
    ("kolkata", "CCU"),
    ("hyderabad", "HYD"),
    ("kochi", "COK"),
    ("goa", "GOI"),
    ("pune", "PNQ"),
    ("ahmedabad", "AMD"),
    ("dubai", "DXB"),
    ("singapore", "SIN"),
    ("london", "LHR"),
    ("new york", "JFK"),
    ("san francisco", "SFO"),
    ("tokyo", "HND"),
    ("paris", "CDG"),
];

/// Alias corrections for cities whose official airport name differs from
/// common usage; applied when phrasing the fallback search query.
const CITY_NAME_FIXES: &[(&str, &str)] = &[
    ("bangalore", "Kempegowda Int"),
    ("mumbai", "Chhatrapati Shivaji"),
    ("kolkata", "Netaji Subhas Chandra"),
];

/// Look up a city in the static table, case-insensitively.
pub fn static_airport_code(city: &str) -> Option<&'static str> {
    let city_lower = city.trim().to_lowercase();
    AIRPORT_CODES
        .iter()
        .find(|(name, _)| *name == city_lower)
        .map(|(_, code)| *code)
}

/// City name to use in search queries, with alias corrections applied.
pub fn search_city_name(city: &str) -> &str {
    let city_lower = city.trim().to_lowercase();
    CITY_NAME_FIXES
        .iter()
        .find(|(name, _)| *name == city_lower)
        .map(|(_, fixed)| *fixed)
        .unwrap_or(city)
}

/// Resolve a free-text city name to an airport code.
///
/// The static table is consulted first; on a miss the aggregator is asked
/// for the code. Search failures collapse into `NotFound` so callers see a
/// single "could not resolve" outcome rather than a transport error.
pub async fn resolve_airport_code(search: &dyn SearchProvider, city: &str) -> Result<String> {
    if let Some(code) = static_airport_code(city) {
        return Ok(code.to_string());
    }

    let query = format!("airport code for {} airport", search_city_name(city));
    match search.search(ENGINE_FLIGHTS, &[("q", query.as_str())]).await {
        Ok(results) => {
            if let Some(code) = departure_airport_code(&results) {
                return Ok(code);
            }
        }
        Err(err) => {
            tracing::warn!(city, error = %err, "airport code lookup failed");
        }
    }

    Err(ApiError::NotFound(format!(
        "could not find an airport code for {city}"
    )))
}

fn departure_airport_code(results: &Value) -> Option<String> {
    results
        .get("search_parameters")?
        .get("departure_airport")?
        .as_str()
        .map(|code| code.to_string())
}
