use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Main error type for the trip planning API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("{0}")]
    NotFound(String),

    #[error("No JSON object could be recovered from the generated text: {reason}")]
    Extraction {
        reason: String,
        /// Raw generator output, kept for diagnostics. Logged on failure,
        /// never returned to the caller.
        raw: String,
    },

    #[error("Generated data does not match the expected schema: {0}")]
    Validation(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Get the error code for structured logging
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::Input(_) => "INPUT_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Extraction { .. } => "EXTRACTION_ERROR",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Input(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Extraction { ref raw, .. } = self {
            tracing::debug!(target: "tripwise::extract", raw = %raw, "raw generator output");
        }
        tracing::error!(code = self.error_code(), "{}", self);
        let body = serde_json::json!({ "detail": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_and_statuses() {
        let err = ApiError::Input("bad date".to_string());
        assert_eq!(err.error_code(), "INPUT_ERROR");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = ApiError::NotFound("no airport code for Atlantis".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = ApiError::Extraction {
            reason: "unbalanced braces".to_string(),
            raw: "{\"a\":".to_string(),
        };
        assert_eq!(err.error_code(), "EXTRACTION_ERROR");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        // The raw payload must never appear in the caller-facing message.
        assert!(!err.to_string().contains("{\"a\":"));
    }
}
