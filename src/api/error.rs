//! Unified error type for the DigitalOcean API adapter.

use thiserror::Error;

/// Errors surfaced by [`super::DropletApi`] implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, or timeout failure before a response was received.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured endpoint could not be parsed or joined.
    #[error("invalid API base URL: {0}")]
    BaseUrl(String),
}
