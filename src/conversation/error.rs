//! Conversation errors.

use crate::auth::AuthError;
use crate::http::summarize_body;
use reqwest::StatusCode;
use thiserror::Error;

/// Failure to exchange one message.
///
/// A failed send leaves the conversation linkage untouched.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Refresh access token: {0}")]
    Auth(#[from] AuthError),

    #[error("Encode conversation request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("POST {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Conversation response status={status}: {}", summarize_body(.body))]
    Status { status: StatusCode, body: String },

    #[error("Read conversation stream: {0}")]
    BodyRead(#[source] std::io::Error),

    #[error("Conversation reply is not valid JSON: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        payload: String,
    },

    #[error("Conversation reply has error: {message}")]
    Remote { message: String },

    #[error("Conversation reply contains no message text")]
    EmptyReply,
}

impl SendError {
    /// HTTP status behind the failure, from either endpoint.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Auth(err) => err.status(),
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether the failure happened while refreshing the access token.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
