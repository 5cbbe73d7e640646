//! Location suggestions backed by a search-grounded generative model.
//!
//! [`SuggestionGateway::suggest`] never fails: short queries, upstream errors,
//! exhausted retries, unparseable model output and panics all come back as an
//! empty list, with a log line explaining why. [`SuggestionGateway::try_suggest`]
//! exposes the typed error for callers that want it.
//!
//! Cancellation is by drop. The lookup holds no locks, so dropping the future
//! (for example when the HTTP client disconnects) aborts the pending backoff
//! sleep or request and no further attempts are made.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use super::gemini::{DEFAULT_API_BASE, DEFAULT_MODEL, GenerateContentResponse};
use super::prompt::suggestion_request;
use super::retry::{GiveUpReason, LookupMachine, RetryConfig, Step};
use super::transport::{HttpTransport, SuggestionTransport};
use crate::error::GatewayError;

/// Queries shorter than this (after trimming) never reach the network.
pub const MIN_QUERY_CHARS: usize = 3;

/// How much of unparseable model output goes into the log.
const SNIPPET_CHARS: usize = 200;

/// A candidate place. Transient: handed to the browser, never stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LocationSuggestion {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationSuggestion {
    /// Strict view of one raw suggestion. `None` unless all four fields are
    /// present and the coordinates are numbers, which is exactly when the
    /// browser lets the user pick it.
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }
}

/// Where and how to reach the suggestion backend.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Default: [`DEFAULT_API_BASE`].
    pub api_base: String,
    /// Default: [`DEFAULT_MODEL`].
    pub model: String,
    /// May be empty; requests then fail upstream.
    pub api_key: String,
    /// Per-attempt HTTP timeout. Default: 30 s.
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Turns free-text queries into candidate locations.
#[derive(Clone)]
pub struct SuggestionGateway {
    transport: Arc<dyn SuggestionTransport>,
    retry: RetryConfig,
}

impl SuggestionGateway {
    pub fn new(transport: Arc<dyn SuggestionTransport>, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    /// Gateway over [`HttpTransport`].
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let transport = HttpTransport::new(
            &config.api_base,
            &config.model,
            config.api_key.clone(),
            config.timeout,
        )?;
        debug!("Suggestion endpoint: {}", transport.url());
        Ok(Self::new(Arc::new(transport), config.retry.clone()))
    }

    /// Suggestions for `query`, or an empty list on any failure.
    pub async fn suggest(&self, query: &str) -> Vec<Value> {
        let outcome = AssertUnwindSafe(self.try_suggest(query))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(GatewayError::Panicked(panic_message(&*panic))));

        match outcome {
            Ok(suggestions) => suggestions,
            Err(e) => {
                match &e {
                    GatewayError::Panicked(_) => {
                        error!("Unexpected error during suggestion lookup: {e}")
                    }
                    e if e.is_payload_error() => warn!("Error parsing model output: {e}"),
                    _ => warn!("Suggestion lookup failed: {e}"),
                }
                Vec::new()
            }
        }
    }

    /// Suggestions for `query` with the failure reason preserved.
    ///
    /// Short queries are not an error: they yield `Ok(vec![])` without a
    /// network call.
    pub async fn try_suggest(&self, query: &str) -> Result<Vec<Value>, GatewayError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            debug!("Query too short for lookup: {query:?}");
            return Ok(Vec::new());
        }

        let request = suggestion_request(query);
        let mut machine = LookupMachine::new(self.retry.clone());
        let mut attempt = machine.start();

        loop {
            debug!("Suggestion request: attempt {attempt}, query {query:?}");
            let response = match self.transport.send(&request).await {
                Ok(r) => r,
                Err(e) => {
                    machine.on_transport_error();
                    return Err(e);
                }
            };

            match machine.on_status(response.status) {
                Step::Accept => {
                    return parse_suggestions(&response.body).inspect_err(|_| machine.fail());
                }
                Step::Backoff {
                    delay,
                    next_attempt,
                } => {
                    warn!(
                        "Transient suggestion API error (HTTP {}, attempt {attempt}). Retrying in {delay:?}...",
                        response.status,
                    );
                    tokio::time::sleep(delay).await;
                    attempt = next_attempt;
                }
                Step::GiveUp(GiveUpReason::Exhausted { status }) => {
                    return Err(GatewayError::Exhausted {
                        attempts: attempt,
                        status,
                        body: response.body,
                    });
                }
                Step::GiveUp(_) => {
                    return Err(GatewayError::Status {
                        status: response.status,
                        body: response.body,
                    });
                }
            }
        }
    }
}

/// Extract the model's text from a `generateContent` body and parse it as a
/// JSON array. Items are passed through untouched.
pub fn parse_suggestions(body: &str) -> Result<Vec<Value>, GatewayError> {
    let envelope: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::Envelope(e.to_string()))?;
    let text = envelope
        .first_text()
        .ok_or_else(|| GatewayError::Envelope("no text in first candidate".to_string()))?;

    let parsed: Value = serde_json::from_str(text).map_err(|error| GatewayError::InvalidJson {
        error,
        snippet: text.chars().take(SNIPPET_CHARS).collect(),
    })?;

    match parsed {
        Value::Array(items) => {
            let selectable = items
                .iter()
                .filter(|v| LocationSuggestion::from_value(v).is_some())
                .count();
            debug!("Parsed {} suggestion(s), {selectable} with coordinates", items.len());
            Ok(items)
        }
        other => Err(GatewayError::NotAnArray(
            other.to_string().chars().take(SNIPPET_CHARS).collect(),
        )),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".to_string())
}
