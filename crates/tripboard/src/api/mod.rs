//! Suggestion backend: wire types, request construction, transport, retry and
//! the gateway that ties them together.
//!
//! - [`gateway`]: [`SuggestionGateway`], the entry point. Never fails; degrades
//!   to an empty list.
//! - [`retry`]: [`RetryConfig`] and the [`LookupMachine`] state machine. 429,
//!   500 and 503 are retried with 1 s, 2 s backoff; nothing else is.
//! - [`transport`]: [`SuggestionTransport`] seam and the `reqwest`-backed
//!   [`HttpTransport`].
//! - [`gemini`]: `generateContent` request/response types.
//! - [`prompt`]: system prompt, response schema and request builder.

pub mod gateway;
pub mod gemini;
pub mod prompt;
pub mod retry;
pub mod transport;

pub use gateway::{GatewayConfig, LocationSuggestion, MIN_QUERY_CHARS, SuggestionGateway};
pub use retry::{LookupMachine, LookupPhase, RetryConfig, Step};
pub use transport::{HttpTransport, SuggestionTransport, TransportResponse};
