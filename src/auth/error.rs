//! Construction and session errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to construct a client.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{field} must be set")]
    MissingField { field: &'static str },

    #[error("{field} contains characters that cannot be sent in an HTTP header")]
    InvalidHeader { field: &'static str },

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure to exchange the session cookies for an access token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("GET {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Read session body: {0}")]
    BodyRead(#[source] reqwest::Error),

    #[error("Session response status={status} not 200")]
    Status { status: StatusCode },

    #[error("Session response is not valid JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Session response does not contain an access token")]
    MissingToken,

    #[error("Session response has error: {message}")]
    Remote { message: String },

    #[error("Access token contains characters that cannot be sent in an HTTP header")]
    InvalidToken,
}

impl AuthError {
    /// HTTP status of the session response, when the failure carries one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Transport { source, .. } | Self::BodyRead(source) => source.status(),
            _ => None,
        }
    }

    /// Whether the failure was a transport-level timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport { source, .. } | Self::BodyRead(source) => source.is_timeout(),
            _ => false,
        }
    }
}
