//! Error types for the Replicate API client.

use thiserror::Error;

/// Errors produced while talking to the Replicate API.
///
/// Transport failures, structured API errors, and decode failures are kept
/// distinct so callers can match on the failure mode. No variant is retried
/// internally; every call is at-most-once.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed due to a network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A request URL could not be constructed.
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server returned a non-2xx status with a decodable error body.
    #[error("{detail}")]
    Api {
        /// The HTTP status code returned.
        status: u16,
        /// The `detail` message from the error envelope.
        detail: String,
    },

    /// The server returned a non-2xx status and the error body could not be
    /// decoded as an error envelope.
    #[error("unexpected response (HTTP {status}): {body}")]
    UnexpectedResponse {
        /// The HTTP status code returned.
        status: u16,
        /// The raw response body, for diagnostics.
        body: String,
    },

    /// A success response body failed to decode.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A model identifier was not of the form `owner/name`.
    #[error("invalid model id '{0}': expected 'owner/name'")]
    InvalidModelId(String),
}

impl Error {
    /// Returns the HTTP status code if the server produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::UnexpectedResponse { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
