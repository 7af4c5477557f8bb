//! Client construction options.

use crate::auth::SESSION_URL;
use crate::conversation::{CONVERSATION_URL, DEFAULT_MODEL};
use std::time::Duration;

/// Endpoints of the web app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub session_url: String,
    pub conversation_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            session_url: SESSION_URL.to_string(),
            conversation_url: CONVERSATION_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Endpoints of a deployment served from `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            session_url: format!("{base}/api/auth/session"),
            conversation_url: format!("{base}/backend-api/conversation"),
        }
    }
}

/// Everything needed to construct a [`ChatGpt`](crate::ChatGpt) client.
#[derive(Clone)]
pub struct ClientOptions {
    pub session_token: String,
    pub clearance_token: String,
    pub user_agent: String,
    /// Per-request timeout. Defaults to ten seconds.
    pub timeout: Option<Duration>,
    /// Span the client's requests are recorded under.
    pub span: Option<tracing::Span>,
    pub endpoints: Endpoints,
    /// Model to request. Defaults to [`DEFAULT_MODEL`].
    pub model: Option<String>,
}

impl ClientOptions {
    pub fn new(
        session_token: impl Into<String>,
        clearance_token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            session_token: session_token.into(),
            clearance_token: clearance_token.into(),
            user_agent: user_agent.into(),
            timeout: None,
            span: None,
            endpoints: Endpoints::default(),
            model: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = Some(span);
        self
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("session_token", &"[REDACTED]")
            .field("clearance_token", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("endpoints", &self.endpoints)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}
