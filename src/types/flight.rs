use serde::{Deserialize, Serialize};

/// One bookable flight option: a price and its legs, in travel order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightOption {
    /// Canonical numeric price; `None` when the aggregator reported none.
    pub price: Option<u64>,
    /// ISO 4217 currency code the price is quoted in
    pub currency: String,
    pub legs: Vec<FlightLeg>,
}

/// A single flight segment with display-ready fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightLeg {
    /// 12-hour display time, e.g. "9:05 AM". Unset together with
    /// `arrival_time` when either raw timestamp was missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,
    /// "Hh Mm" display string, omitted when the raw minute count was absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub airline: String,
    /// "Nonstop" | "1 stop" | "N stops"
    pub stops: String,
    /// "via A & B" detail when intermediate airports are named
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
}
