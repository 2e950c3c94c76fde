//! API routes: itinerary generation, flight search, generative flight
//! listing, hotel search, and the liveness root.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::airports::resolve_airport_code;
use crate::error::{ApiError, Result};
use crate::extract::extract_json_object;
use crate::normalize::{normalize_flight_results, normalize_generated_flights, normalize_itinerary};
use crate::prompt::{flight_listing_prompt, itinerary_prompt};
use crate::server::AppState;
use crate::services::search::{ENGINE_FLIGHTS, ENGINE_HOTELS};
use crate::types::{FlightOption, Itinerary, TripRequest};

type AppStateArc = Arc<AppState>;

pub fn api_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(root))
        .route("/api/generate-itinerary", post(generate_itinerary))
        .route("/api/flights/search", get(search_flights))
        .route("/api/flights", get(generated_flights))
        .route("/api/hotels", get(search_hotels))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the tripwise API." }))
}

async fn generate_itinerary(
    State(state): State<AppStateArc>,
    Json(request): Json<TripRequest>,
) -> Result<Json<Itinerary>> {
    info!(
        destination = %request.destination,
        duration = request.duration,
        travelers = request.travelers,
        "generating itinerary"
    );
    request.validate()?;

    let prompt = itinerary_prompt(&request);
    let raw = state.generator.generate(&prompt).await?;
    let tree = extract_json_object(&raw)?;

    let itinerary = normalize_itinerary(tree, &request, state.search.as_deref()).await?;
    Ok(Json(itinerary))
}

#[derive(Debug, Deserialize)]
struct FlightSearchParams {
    /// Source city or airport code
    source: String,
    /// Destination city or airport code
    destination: String,
    /// Travel date in YYYY-MM-DD format
    date: Option<String>,
}

#[derive(Debug, Serialize)]
struct FlightsResponse {
    flights: Vec<FlightOption>,
}

async fn search_flights(
    State(state): State<AppStateArc>,
    Query(params): Query<FlightSearchParams>,
) -> Result<Json<FlightsResponse>> {
    info!(
        source = %params.source,
        destination = %params.destination,
        date = params.date.as_deref().unwrap_or("unspecified"),
        "searching flights"
    );
    let search = state.search()?;

    if let Some(date) = params.date.as_deref() {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            ApiError::Input("invalid date format, expected YYYY-MM-DD".to_string())
        })?;
    }

    // The two resolutions are independent; run them concurrently.
    let (source_code, destination_code) = tokio::try_join!(
        resolve_airport_code(search, &params.source),
        resolve_airport_code(search, &params.destination),
    )?;

    let mut query: Vec<(&str, &str)> = vec![
        ("departure_id", source_code.as_str()),
        ("arrival_id", destination_code.as_str()),
    ];
    if let Some(date) = params.date.as_deref() {
        query.push(("outbound_date", date));
    }

    let results = search.search(ENGINE_FLIGHTS, &query).await?;
    let flights = normalize_flight_results(results)?;
    Ok(Json(FlightsResponse { flights }))
}

#[derive(Debug, Deserialize)]
struct GeneratedFlightParams {
    source_city: String,
    destination_city: String,
    travel_date: Option<String>,
}

/// Flight listing backed by the text generator instead of the aggregator.
/// Output uses the same canonical shape as `/api/flights/search`.
async fn generated_flights(
    State(state): State<AppStateArc>,
    Query(params): Query<GeneratedFlightParams>,
) -> Result<Json<FlightsResponse>> {
    info!(
        source = %params.source_city,
        destination = %params.destination_city,
        "generating flight listing"
    );
    if let Some(date) = params.travel_date.as_deref() {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            ApiError::Input("invalid date format, expected YYYY-MM-DD".to_string())
        })?;
    }

    let prompt = flight_listing_prompt(
        &params.source_city,
        &params.destination_city,
        params.travel_date.as_deref(),
    );
    let raw = state.generator.generate(&prompt).await?;
    let tree = extract_json_object(&raw)?;

    let flights = normalize_generated_flights(tree)?;
    Ok(Json(FlightsResponse { flights }))
}

#[derive(Debug, Deserialize)]
struct HotelSearchParams {
    query: String,
}

/// Hotel search passthrough: the aggregator `properties` list is returned
/// unshaped.
async fn search_hotels(
    State(state): State<AppStateArc>,
    Query(params): Query<HotelSearchParams>,
) -> Result<Json<Value>> {
    info!(query = %params.query, "searching hotels");
    let search = state.search()?;

    let results = search
        .search(ENGINE_HOTELS, &[("q", params.query.as_str())])
        .await?;
    if let Some(message) = results.get("error").and_then(Value::as_str) {
        return Err(ApiError::Upstream(message.to_string()));
    }

    let properties = results
        .get("properties")
        .cloned()
        .unwrap_or_else(|| json!([]));
    Ok(Json(json!({ "properties": properties })))
}
