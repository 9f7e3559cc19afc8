//! Concrete client for the waste-collection backend.

mod client;

pub use client::{BackendClient, UserProfile};

use thiserror::Error;

/// Failure taxonomy for backend calls.
///
/// The rollup engine never sees any of these: orchestration stops before
/// aggregating whenever a fetch fails.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached (connect failure or timeout).
    #[error("could not connect to backend, is it running? ({source})")]
    Unavailable {
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The backend answered 200 but with an `{"error": …}` payload.
    #[error("backend rejected the request: {0}")]
    Rejected(String),

    /// The response body was not the JSON shape this client expects.
    #[error("malformed response from backend: {0}")]
    Malformed(String),

    /// A request body failed to encode as JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// Base URL and path did not combine into a valid URL.
    #[error("invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
