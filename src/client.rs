//! Entry point tying the session manager and conversations together.

use crate::auth::{AccessToken, AuthError, BuildError, Credentials, SessionManager};
use crate::conversation::{Conversation, DEFAULT_MODEL};
use crate::http::{DEFAULT_TIMEOUT, WebClient};
use crate::options::ClientOptions;
use reqwest::header::HeaderValue;
use std::sync::Arc;

/// Client for the web app, authenticated with browser session cookies.
///
/// Cloning is cheap. Clones and every conversation created from them share
/// one [`SessionManager`] and therefore one cached access token.
#[derive(Debug, Clone)]
pub struct ChatGpt {
    session: Arc<SessionManager>,
    http: WebClient,
    conversation_url: Arc<str>,
    model: Arc<str>,
    clearance_cookie: HeaderValue,
    span: tracing::Span,
}

impl ChatGpt {
    /// Create a client.
    ///
    /// Fails if the session token, clearance token or user agent is empty,
    /// or cannot be sent as an HTTP header.
    pub fn new(options: ClientOptions) -> Result<Self, BuildError> {
        let credentials = Credentials::new(
            options.session_token,
            options.clearance_token,
            options.user_agent,
        )?;
        let span = options.span.unwrap_or_else(tracing::Span::none);
        let http = WebClient::new(
            credentials.user_agent(),
            options.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )?;
        let session = SessionManager::new(
            &credentials,
            http.clone(),
            options.endpoints.session_url,
            span.clone(),
        )?;

        Ok(Self {
            session: Arc::new(session),
            http,
            conversation_url: options.endpoints.conversation_url.into(),
            model: options.model.as_deref().unwrap_or(DEFAULT_MODEL).into(),
            clearance_cookie: credentials.clearance_cookie()?,
            span,
        })
    }

    /// Start a new dialogue.
    #[must_use]
    pub fn new_conversation(&self) -> Conversation {
        Conversation::new(self.clone(), None, None)
    }

    /// Continue an existing dialogue. Empty ids count as absent.
    #[must_use]
    pub fn conversation(
        &self,
        conversation_id: Option<String>,
        parent_message_id: Option<String>,
    ) -> Conversation {
        Conversation::new(
            self.clone(),
            conversation_id.filter(|id| !id.is_empty()),
            parent_message_id.filter(|id| !id.is_empty()),
        )
    }

    /// Return a valid access token, refreshing it if needed.
    pub async fn ensure_valid_token(&self) -> Result<AccessToken, AuthError> {
        self.session.ensure_valid_token().await
    }

    /// Session manager shared by this client's conversations.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Model requested for every message.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn http(&self) -> &WebClient {
        &self.http
    }

    pub(crate) fn conversation_url(&self) -> &str {
        &self.conversation_url
    }

    pub(crate) fn clearance_cookie(&self) -> &HeaderValue {
        &self.clearance_cookie
    }

    pub(crate) fn span(&self) -> &tracing::Span {
        &self.span
    }
}
