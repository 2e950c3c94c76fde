use chrono::{NaiveTime, Timelike};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::types::{FlightLeg, FlightOption};

/// Currency all normalized prices are quoted in. The aggregator is queried
/// without a currency override and reports INR amounts for these routes.
const PRICE_CURRENCY: &str = "INR";

/// Typed intermediate shape of the aggregator flight tree. All fields are
/// optional at this boundary; presence checks happen exactly once, here.
#[derive(Debug, Deserialize)]
struct RawFlightResults {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    best_flights: Vec<RawFlightEntry>,
    #[serde(default)]
    other_flights: Vec<RawFlightEntry>,
}

#[derive(Debug, Deserialize)]
struct RawFlightEntry {
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    flights: Vec<RawFlightLeg>,
}

#[derive(Debug, Deserialize)]
struct RawFlightLeg {
    #[serde(default)]
    departure_airport: Option<RawAirportStop>,
    #[serde(default)]
    arrival_airport: Option<RawAirportStop>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    airline: Option<String>,
    #[serde(default)]
    number_of_stops: u32,
    #[serde(default)]
    intermediate_airports: Vec<String>,
    #[serde(default)]
    flight_number: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAirportStop {
    #[serde(default)]
    time: Option<String>,
}

/// Normalize an aggregator flight-search tree into canonical options.
///
/// An aggregator-reported `error` short-circuits before any entry is
/// processed. Primary ("best") entries come first, alternate ("other")
/// entries after; every leg of every entry is preserved.
pub fn normalize_flight_results(tree: Value) -> Result<Vec<FlightOption>> {
    let raw: RawFlightResults = serde_json::from_value(tree)
        .map_err(|err| ApiError::Validation(format!("unexpected flight result shape: {err}")))?;

    if let Some(message) = raw.error {
        return Err(ApiError::Upstream(message));
    }

    Ok(raw
        .best_flights
        .into_iter()
        .chain(raw.other_flights)
        .map(normalize_entry)
        .collect())
}

fn normalize_entry(entry: RawFlightEntry) -> FlightOption {
    FlightOption {
        price: entry.price.map(|p| p.round() as u64),
        currency: PRICE_CURRENCY.to_string(),
        legs: entry.flights.into_iter().map(normalize_leg).collect(),
    }
}

fn normalize_leg(leg: RawFlightLeg) -> FlightLeg {
    let departure = leg
        .departure_airport
        .and_then(|stop| stop.time)
        .and_then(|time| display_time(&time));
    let arrival = leg
        .arrival_airport
        .and_then(|stop| stop.time)
        .and_then(|time| display_time(&time));

    // Both display times or neither; a lone timestamp is worse than none.
    let (departure_time, arrival_time) = match (departure, arrival) {
        (Some(dep), Some(arr)) => (Some(dep), Some(arr)),
        _ => (None, None),
    };

    FlightLeg {
        departure_time,
        arrival_time,
        duration: leg.duration.map(duration_label),
        airline: leg
            .airline
            .unwrap_or_else(|| "Unknown Airline".to_string()),
        stops: stop_label(leg.number_of_stops),
        stop_details: stop_details(&leg.intermediate_airports, leg.number_of_stops),
        flight_number: leg.flight_number,
    }
}

/// 0 -> "Nonstop", 1 -> "1 stop", N -> "N stops"
pub(crate) fn stop_label(stops: u32) -> String {
    match stops {
        0 => "Nonstop".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{n} stops"),
    }
}

/// "via A & B" when intermediate airports are named for a stopping flight.
pub(crate) fn stop_details(intermediates: &[String], stops: u32) -> Option<String> {
    if stops == 0 || intermediates.is_empty() {
        return None;
    }
    Some(format!("via {}", intermediates.join(" & ")))
}

/// Minutes -> "Hh Mm" display string.
pub(crate) fn duration_label(minutes: u64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Reformat an ISO-8601-like timestamp to a 12-hour display time.
///
/// Only the hour:minute portion after the date is used; minutes always
/// render as two digits ("5:05 AM", never "5:5 AM").
pub(crate) fn display_time(raw: &str) -> Option<String> {
    let time_part = raw.split_once('T').map_or(raw, |(_, time)| time);
    let hhmm = time_part.get(..5)?;
    let parsed = NaiveTime::parse_from_str(hhmm, "%H:%M").ok()?;

    let (hour12, meridiem) = match parsed.hour() {
        0 => (12, "AM"),
        hour @ 1..=11 => (hour, "AM"),
        12 => (12, "PM"),
        hour => (hour - 12, "PM"),
    };
    Some(format!("{}:{:02} {}", hour12, parsed.minute(), meridiem))
}

/// Loose per-entry shape produced by the generative flight listing.
#[derive(Debug, Deserialize)]
struct RawGeneratedListing {
    #[serde(default)]
    flights: Vec<RawGeneratedFlight>,
}

#[derive(Debug, Deserialize)]
struct RawGeneratedFlight {
    #[serde(default)]
    airline: Option<String>,
    #[serde(default)]
    flight_number: Option<String>,
    #[serde(default)]
    departure_time: Option<String>,
    #[serde(default)]
    arrival_time: Option<String>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    stops: u32,
    #[serde(default)]
    price: Option<Value>,
}

/// Map a generated flight listing onto the same canonical shape the
/// aggregator path produces, so both flight endpoints agree.
pub fn normalize_generated_flights(tree: Value) -> Result<Vec<FlightOption>> {
    let raw: RawGeneratedListing = serde_json::from_value(tree).map_err(|err| {
        ApiError::Validation(format!("unexpected generated flight shape: {err}"))
    })?;

    Ok(raw
        .flights
        .into_iter()
        .map(|flight| {
            let departure = flight
                .departure_time
                .as_deref()
                .and_then(display_time);
            let arrival = flight.arrival_time.as_deref().and_then(display_time);
            let (departure_time, arrival_time) = match (departure, arrival) {
                (Some(dep), Some(arr)) => (Some(dep), Some(arr)),
                _ => (None, None),
            };

            FlightOption {
                price: flight.price.as_ref().and_then(parse_price),
                currency: PRICE_CURRENCY.to_string(),
                legs: vec![FlightLeg {
                    departure_time,
                    arrival_time,
                    duration: flight.duration.map(duration_label),
                    airline: flight
                        .airline
                        .unwrap_or_else(|| "Unknown Airline".to_string()),
                    stops: stop_label(flight.stops),
                    stop_details: None,
                    flight_number: flight.flight_number,
                }],
            }
        })
        .collect())
}

/// Accept a numeric price or a currency-formatted string ("₹4,500").
fn parse_price(value: &Value) -> Option<u64> {
    if let Some(number) = value.as_f64() {
        return Some(number.round() as u64);
    }
    let text = value.as_str()?;
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stop_labels_are_exact() {
        assert_eq!(stop_label(0), "Nonstop");
        assert_eq!(stop_label(1), "1 stop");
        assert_eq!(stop_label(3), "3 stops");
    }

    #[test]
    fn stop_details_join_with_ampersand() {
        let vias = vec!["Hyderabad".to_string(), "Nagpur".to_string()];
        assert_eq!(stop_details(&vias, 2).as_deref(), Some("via Hyderabad & Nagpur"));
        assert_eq!(stop_details(&vias, 0), None);
        assert_eq!(stop_details(&[], 1), None);
    }

    #[test]
    fn duration_labels() {
        assert_eq!(duration_label(90), "1h 30m");
        assert_eq!(duration_label(60), "1h 0m");
        assert_eq!(duration_label(45), "0h 45m");
    }

    #[test]
    fn display_time_formatting() {
        assert_eq!(display_time("2026-09-01T05:05").as_deref(), Some("5:05 AM"));
        assert_eq!(display_time("2026-09-01T13:00").as_deref(), Some("1:00 PM"));
        assert_eq!(display_time("2026-09-01T00:30").as_deref(), Some("12:30 AM"));
        assert_eq!(display_time("2026-09-01T12:15").as_deref(), Some("12:15 PM"));
        assert_eq!(display_time("09:05").as_deref(), Some("9:05 AM"));
        assert_eq!(display_time("not a time"), None);
    }

    fn leg(dep: Option<&str>, arr: Option<&str>) -> Value {
        json!({
            "departure_airport": {"time": dep},
            "arrival_airport": {"time": arr},
            "duration": 85,
            "airline": "IndiGo",
            "number_of_stops": 0,
            "flight_number": "6E 123"
        })
    }

    #[test]
    fn best_and_other_flights_concatenate_in_order() {
        let tree = json!({
            "best_flights": [
                {"price": 4500, "flights": [leg(Some("2026-09-01T06:00"), Some("2026-09-01T07:25"))]}
            ],
            "other_flights": [
                {"price": 3200, "flights": [
                    leg(Some("2026-09-01T09:00"), Some("2026-09-01T11:00")),
                    leg(Some("2026-09-01T12:00"), Some("2026-09-01T13:30"))
                ]}
            ]
        });

        let options = normalize_flight_results(tree).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].price, Some(4500));
        assert_eq!(options[1].price, Some(3200));
        // Alternate entries keep every leg; no first-leg truncation.
        assert_eq!(options[1].legs.len(), 2);
        assert_eq!(options[1].legs[1].departure_time.as_deref(), Some("12:00 PM"));
    }

    #[test]
    fn missing_timestamp_clears_both_display_times() {
        let tree = json!({
            "best_flights": [
                {"price": 4500, "flights": [leg(Some("2026-09-01T06:00"), None)]}
            ]
        });
        let options = normalize_flight_results(tree).unwrap();
        let leg = &options[0].legs[0];
        assert!(leg.departure_time.is_none());
        assert!(leg.arrival_time.is_none());
        assert_eq!(leg.duration.as_deref(), Some("1h 25m"));
    }

    #[test]
    fn aggregator_error_short_circuits() {
        let tree = json!({
            "error": "Rate limit reached",
            "best_flights": [
                {"price": 4500, "flights": [leg(Some("2026-09-01T06:00"), Some("2026-09-01T07:25"))]}
            ]
        });
        let err = normalize_flight_results(tree).unwrap_err();
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
        assert!(err.to_string().contains("Rate limit reached"));
    }

    #[test]
    fn stopping_flight_gets_details() {
        let tree = json!({
            "other_flights": [{
                "price": 5100.0,
                "flights": [{
                    "departure_airport": {"time": "2026-09-01T06:00"},
                    "arrival_airport": {"time": "2026-09-01T11:45"},
                    "duration": 345,
                    "airline": "Air India",
                    "number_of_stops": 2,
                    "intermediate_airports": ["Hyderabad", "Nagpur"]
                }]
            }]
        });
        let options = normalize_flight_results(tree).unwrap();
        let leg = &options[0].legs[0];
        assert_eq!(leg.stops, "2 stops");
        assert_eq!(leg.stop_details.as_deref(), Some("via Hyderabad & Nagpur"));
        assert_eq!(leg.airline, "Air India");
        assert!(leg.flight_number.is_none());
    }

    #[test]
    fn empty_tree_yields_empty_list() {
        let options = normalize_flight_results(json!({})).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn generated_listing_maps_to_canonical_options() {
        let tree = json!({
            "flights": [{
                "airline": "IndiGo",
                "flight_number": "6E 455",
                "departure_time": "06:15",
                "arrival_time": "07:40",
                "duration": 85,
                "stops": 0,
                "price": "₹4,500"
            }]
        });
        let options = normalize_generated_flights(tree).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].price, Some(4500));
        assert_eq!(options[0].currency, "INR");
        let leg = &options[0].legs[0];
        assert_eq!(leg.departure_time.as_deref(), Some("6:15 AM"));
        assert_eq!(leg.arrival_time.as_deref(), Some("7:40 AM"));
        assert_eq!(leg.stops, "Nonstop");
    }

    #[test]
    fn generated_numeric_price_accepted() {
        let tree = json!({"flights": [{"airline": "Vistara", "price": 6100}]});
        let options = normalize_generated_flights(tree).unwrap();
        assert_eq!(options[0].price, Some(6100));
    }
}
