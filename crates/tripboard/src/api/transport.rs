//! The seam between the gateway and the network.
//!
//! [`SuggestionTransport`] sends one `generateContent` request and reports the
//! raw status and body. It makes no retry decisions and does no parsing, so
//! tests can script any sequence of upstream behavior.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, trace};

use super::gemini::{GenerateContentRequest, generate_content_url};
use crate::error::GatewayError;

/// Status and body of one upstream exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a single request. Implementations must not retry.
#[async_trait]
pub trait SuggestionTransport: Send + Sync {
    async fn send(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<TransportResponse, GatewayError>;
}

/// Production transport over `reqwest`.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpTransport {
    /// Build a transport for `{api_base}/models/{model}:generateContent`.
    ///
    /// An empty `api_key` is allowed; upstream will reject the request and
    /// the gateway degrades to no suggestions.
    pub fn new(
        api_base: &str,
        model: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tripboard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: generate_content_url(api_base, model),
            api_key: api_key.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SuggestionTransport for HttpTransport {
    async fn send(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<TransportResponse, GatewayError> {
        trace!(
            "Suggestion payload size: {} bytes",
            serde_json::to_string(request).map_or(0, |s| s.len())
        );
        let start = Instant::now();

        let mut builder = self.client.post(&self.url).json(request);
        if !self.api_key.is_empty() {
            builder = builder.header("x-goog-api-key", &self.api_key);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| GatewayError::Transport(format!("failed to read response: {e}")))?;

        debug!(
            "Suggestion response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            body.len()
        );
        Ok(TransportResponse { status, body })
    }
}
