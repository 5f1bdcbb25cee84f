//! Error types for the completion client.

use thiserror::Error;

/// Errors that can occur when calling the completion API.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error body.
    #[error("API error ({error_type}): {message}")]
    Api {
        /// Error type from the API.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The API key cannot be sent as a header.
    #[error("API key contains invalid header characters")]
    InvalidApiKey,

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response held no message text.
    #[error("completion had no content")]
    EmptyCompletion,
}

/// Error body returned by OpenAI-compatible APIs.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error type (absent on some compatible servers).
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::RateLimited(60);
        assert_eq!(err.to_string(), "rate limited, retry after 60 seconds");

        let err = LlmError::Api {
            error_type: "invalid_request_error".to_string(),
            message: "model not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (invalid_request_error): model not found"
        );
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "message": "You exceeded your current quota",
                "type": "insufficient_quota",
                "param": null,
                "code": "insufficient_quota"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.error_type.as_deref(), Some("insufficient_quota"));
        assert_eq!(response.error.message, "You exceeded your current quota");
    }

    #[test]
    fn test_api_error_without_type() {
        let json = r#"{"error": {"message": "bad request"}}"#;
        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert!(response.error.error_type.is_none());
    }
}
