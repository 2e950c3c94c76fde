use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{ApiError, Result};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Text-generation service boundary.
///
/// The production implementation is [`GeminiClient`]; tests substitute
/// canned-output doubles.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a prompt and return the raw generated text. The text is
    /// expected, but not guaranteed, to contain a JSON object.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Config(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client,
        })
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        // Single best-effort attempt, no retries. The key rides in the query
        // string, so transport errors are reported without their URL.
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                ApiError::Upstream(format!("generation request failed: {}", err.without_url()))
            })?;

        let status = response.status();
        let response_json: Value = response.json().await.map_err(|err| {
            ApiError::Upstream(format!(
                "failed to read generation response: {}",
                err.without_url()
            ))
        })?;

        if !status.is_success() {
            let api_message = response_json
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|value| value.as_str())
                .unwrap_or("no error detail");
            return Err(ApiError::Upstream(format!(
                "generation service returned HTTP {status}: {api_message}"
            )));
        }

        let text = collect_candidate_text(&response_json).ok_or_else(|| {
            ApiError::Upstream("generation response contained no candidate text".to_string())
        })?;

        tracing::debug!(target: "tripwise::generation", chars = text.len(), "received generated text");
        Ok(text)
    }
}

/// Concatenate the text parts of the first candidate.
fn collect_candidate_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate_body(text: &str) -> String {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn generate_returns_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(mockito::Matcher::UrlEncoded(
                "key".to_string(),
                "test-key".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(candidate_body("{\"title\": \"Goa\"}"))
            .create_async()
            .await;

        let mut client = GeminiClient::new("test-key").unwrap();
        client.set_base_url(server.url());

        let text = client.generate("plan a trip").await.unwrap();
        assert_eq!(text, "{\"title\": \"Goa\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_surfaces_api_error_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(json!({"error": {"message": "API key not valid"}}).to_string())
            .create_async()
            .await;

        let mut client = GeminiClient::new("bad-key").unwrap();
        client.set_base_url(server.url());

        let err = client.generate("plan a trip").await.unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn empty_candidates_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"candidates": []}).to_string())
            .create_async()
            .await;

        let mut client = GeminiClient::new("test-key").unwrap();
        client.set_base_url(server.url());

        let err = client.generate("plan a trip").await.unwrap_err();
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
    }
}
