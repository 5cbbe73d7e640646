//! Error types for the suggestion gateway.

use thiserror::Error;

/// Everything that can keep a suggestion lookup from producing results.
///
/// None of these reach the browser:
/// [`SuggestionGateway::suggest`](crate::SuggestionGateway::suggest) logs them
/// and answers with an empty list.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced an HTTP status (DNS, connect, timeout, body read).
    #[error("request failed: {0}")]
    Transport(String),

    /// A status that is not retried.
    #[error("suggestion API HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A retryable status on every attempt.
    #[error("suggestion API HTTP {status} after {attempts} attempts: {body}")]
    Exhausted {
        attempts: u32,
        status: u16,
        body: String,
    },

    /// HTTP 200 but the response is not the expected `generateContent` shape.
    #[error("malformed response envelope: {0}")]
    Envelope(String),

    /// The model's text is not JSON.
    #[error("model output is not valid JSON ({error}): {snippet}...")]
    InvalidJson {
        #[source]
        error: serde_json::Error,
        /// Leading part of the offending text.
        snippet: String,
    },

    /// The model's text is JSON, but not an array.
    #[error("model output is not a JSON array: {0}")]
    NotAnArray(String),

    /// The lookup panicked.
    #[error("unexpected failure: {0}")]
    Panicked(String),
}

impl GatewayError {
    /// Whether the failure came from the model output rather than the HTTP exchange.
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            GatewayError::Envelope(_)
                | GatewayError::InvalidJson { .. }
                | GatewayError::NotAnArray(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_includes_code_and_body() {
        let e = GatewayError::Status {
            status: 403,
            body: "API key not valid".into(),
        };
        assert_eq!(e.to_string(), "suggestion API HTTP 403: API key not valid");
        assert!(!e.is_payload_error());
    }

    #[test]
    fn payload_errors_are_classified() {
        let bad = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let e = GatewayError::InvalidJson {
            error: bad,
            snippet: "nope".into(),
        };
        assert!(e.is_payload_error());
        assert!(e.to_string().starts_with("model output is not valid JSON"));
        assert!(GatewayError::NotAnArray("{}".into()).is_payload_error());
    }
}
