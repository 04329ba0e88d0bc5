//! Error types for the Groq client.
//!
//! Every fallible operation returns [`Error`]. API failures carry the HTTP
//! status so callers can branch on it:
//!
//! ```rust,ignore
//! match client.create_chat_completion(request).await {
//!     Err(groq::Error::Api(e)) if e.is_rate_limited() => { /* back off */ }
//!     Err(e) => return Err(e.into()),
//!     Ok(response) => { /* ... */ }
//! }
//! ```

use reqwest::StatusCode;
use serde::Deserialize;

/// Result type alias for Groq operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the Groq client.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The client could not be configured (missing or invalid credential,
    /// HTTP client construction failure).
    #[error("Configuration error: {0}")]
    Config(String),

    /// An argument was rejected before any network activity.
    ///
    /// Raised by the client's own checks (a request without a model or
    /// without messages), never by the API; API-side validation failures
    /// arrive as [`Error::Api`] with status 400.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The API answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The API answered with a success status but the body could not be decoded.
    #[error("Failed to deserialize response: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    /// The operation was cancelled before the response arrived.
    #[error("Request cancelled")]
    Cancelled,

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error from a byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// HTTP status of an API failure.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api(e) => Some(e.status),
            _ => None,
        }
    }

    /// The API failure, if this is one.
    #[must_use]
    pub const fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// A non-success response from the API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Groq API error: {message}")]
#[non_exhaustive]
pub struct ApiError {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Message from the error body, or a generic message naming the status.
    pub message: String,
    /// Error type reported by the API (e.g. `"invalid_request_error"`).
    pub error_type: Option<String>,
    /// Machine-readable error code reported by the API.
    pub code: Option<String>,
}

impl ApiError {
    /// Create an API error with only a status and message.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error_type: None,
            code: None,
        }
    }

    /// Build the error for a failed response from its status and body text.
    ///
    /// Uses the message of a `{"error": {"message", "type", "code"}}` envelope
    /// when present; otherwise falls back to
    /// `API request failed with status code {status}`. Never fails.
    #[must_use]
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|r| r.error);

        match detail {
            Some(ErrorDetail {
                message: Some(message),
                error_type,
                code,
            }) if !message.trim().is_empty() => Self {
                status,
                message,
                error_type,
                code,
            },
            _ => Self::new(
                status,
                format!("API request failed with status code {}", status.as_u16()),
            ),
        }
    }

    /// Check if the request was rejected by rate limiting (429).
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS
    }

    /// Check if the credential was rejected (401 or 403).
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(
            self.status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        )
    }
}

/// Error envelope returned by the API on any non-success status.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_error_message() {
        let err = ApiError::from_response_body(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"rate limited"}}"#,
        );
        assert_eq!(err.message, "rate limited");
        assert_eq!(err.status.as_u16(), 429);
        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), "Groq API error: rate limited");
    }

    #[test]
    fn test_type_and_code_carried() {
        let err = ApiError::from_response_body(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error","code":"invalid_api_key"}}"#,
        );
        assert_eq!(err.error_type.as_deref(), Some("invalid_request_error"));
        assert_eq!(err.code.as_deref(), Some("invalid_api_key"));
        assert!(err.is_auth());
    }

    #[test]
    fn test_unparseable_body_falls_back() {
        let err = ApiError::from_response_body(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops");
        assert_eq!(err.message, "API request failed with status code 500");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_message_falls_back() {
        for body in [
            "",
            "{}",
            r#"{"error":null}"#,
            r#"{"error":{"type":"server_error"}}"#,
            r#"{"error":{"message":"  "}}"#,
            r#"{"error":"plain string"}"#,
        ] {
            let err = ApiError::from_response_body(StatusCode::BAD_GATEWAY, body);
            assert_eq!(
                err.message, "API request failed with status code 502",
                "body: {body}"
            );
        }
    }

    #[test]
    fn test_error_status_accessor() {
        let err = Error::from(ApiError::new(StatusCode::BAD_REQUEST, "bad"));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.to_string(), "Groq API error: bad");
        assert!(Error::Cancelled.status().is_none());
        assert!(Error::config("x").as_api().is_none());
    }
}
