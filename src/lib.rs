//! tripwise: an AI-assisted travel planning backend
//!
//! This library turns a structured trip request into a generated, validated
//! travel itinerary, and maps heterogeneous flight/hotel search results onto
//! one canonical output schema. The text-generation and search services are
//! injected behind traits so they can be substituted with test doubles.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tripwise::{server, GeminiClient, Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     dotenvy::dotenv().ok();
//!     let settings = Settings::from_env()?;
//!     let generator = Arc::new(GeminiClient::new(settings.generation_api_key.clone())?);
//!     let state = server::AppState::new(generator, None);
//!     server::run("127.0.0.1:8000".parse()?, state).await
//! }
//! ```

pub mod airports;
pub mod config;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod prompt;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;

pub use config::Settings;
pub use error::{ApiError, Result};
pub use extract::extract_json_object;
pub use normalize::{normalize_flight_results, normalize_generated_flights, normalize_itinerary};
pub use server::{router, AppState};
pub use services::{GeminiClient, SearchProvider, SerpApiClient, TextGenerator};
pub use types::{Activity, DayPlan, FlightLeg, FlightOption, Itinerary, TimeOfDay, TripRequest};

#[cfg(feature = "cli")]
pub mod cli;
