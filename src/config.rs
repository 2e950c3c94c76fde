use crate::error::{ApiError, Result};

/// Process-wide configuration, loaded once at startup and immutable after.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Key for the text-generation service. Required at startup.
    pub generation_api_key: String,
    /// Key for the search aggregator. Optional at startup; endpoints that
    /// depend on it fail on first use when it is absent.
    pub search_api_key: Option<String>,
}

impl Settings {
    /// Load settings from the environment (`GEMINI_API_KEY`, `SERPAPI_KEY`).
    ///
    /// Callers are expected to have run `dotenvy::dotenv()` beforehand.
    pub fn from_env() -> Result<Self> {
        let generation_api_key = std::env::var("GEMINI_API_KEY").map_err(|_| {
            ApiError::Config(
                "GEMINI_API_KEY not found in environment. Create a .env file and add it."
                    .to_string(),
            )
        })?;

        let search_api_key = std::env::var("SERPAPI_KEY").ok().filter(|k| !k.is_empty());
        if search_api_key.is_none() {
            tracing::warn!("SERPAPI_KEY not set; flight/hotel search endpoints will be unavailable");
        }

        Ok(Self {
            generation_api_key,
            search_api_key,
        })
    }
}
