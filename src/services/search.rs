use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ApiError, Result};

const DEFAULT_BASE_URL: &str = "https://serpapi.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Engine names understood by the search aggregator.
pub const ENGINE_FLIGHTS: &str = "google_flights";
pub const ENGINE_IMAGES: &str = "google_images";
pub const ENGINE_HOTELS: &str = "google_hotels";

/// Search aggregator boundary.
///
/// Returns the raw heterogeneous JSON tree for the given engine; callers
/// decode it into their own typed intermediate shapes.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, engine: &str, params: &[(&str, &str)]) -> Result<Value>;
}

/// Client for the SerpApi `search.json` endpoint.
#[derive(Clone, Debug)]
pub struct SerpApiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl SerpApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        })
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, engine: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/search.json", self.base_url.trim_end_matches('/'));

        let mut query: Vec<(&str, &str)> = vec![("engine", engine), ("api_key", &self.api_key)];
        query.extend_from_slice(params);

        // Single attempt; the key rides in the query string, so transport
        // errors are reported without their URL.
        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|err| {
                ApiError::Upstream(format!("search request failed: {}", err.without_url()))
            })?;

        let status = response.status();
        let body: Value = response.json().await.map_err(|err| {
            ApiError::Upstream(format!(
                "failed to read search response: {}",
                err.without_url()
            ))
        })?;

        if !status.is_success() {
            let api_message = body
                .get("error")
                .and_then(|value| value.as_str())
                .unwrap_or("no error detail");
            return Err(ApiError::Upstream(format!(
                "search aggregator returned HTTP {status}: {api_message}"
            )));
        }

        tracing::debug!(target: "tripwise::search", engine, "received search results");
        Ok(body)
    }
}
