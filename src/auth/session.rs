//! Exchange of session cookies for a cached bearer token.

use super::credentials::{AccessToken, Credentials};
use super::error::{AuthError, BuildError};
use crate::http::WebClient;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::Instrument;

/// Session endpoint of the web app.
pub const SESSION_URL: &str = "https://chat.openai.com/api/auth/session";

/// Body of the session endpoint. `user` is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    #[serde(default)]
    expires: Option<DateTime<Utc>>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Holds the session credentials and the access token cache.
///
/// The cache is guarded by an async mutex held across a refresh, so
/// concurrent callers sharing one manager trigger a single refresh.
pub struct SessionManager {
    http: WebClient,
    url: String,
    cookie: HeaderValue,
    cached: Mutex<Option<AccessToken>>,
    span: tracing::Span,
}

impl SessionManager {
    /// Create a manager for `credentials` talking to `url`.
    pub fn new(
        credentials: &Credentials,
        http: WebClient,
        url: impl Into<String>,
        span: tracing::Span,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            http,
            url: url.into(),
            cookie: credentials.session_cookie()?,
            cached: Mutex::new(None),
            span,
        })
    }

    /// Return a valid access token, refreshing it only if none is cached
    /// or the cached one has expired.
    pub async fn ensure_valid_token(&self) -> Result<AccessToken, AuthError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && !token.is_expired()
        {
            return Ok(token.clone());
        }

        let token = self
            .refresh()
            .instrument(self.span.clone())
            .await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Snapshot of the cached token.
    pub async fn access_token(&self) -> Option<AccessToken> {
        self.cached.lock().await.clone()
    }

    /// Start from a previously obtained token.
    pub async fn seed_access_token(&self, token: AccessToken) {
        *self.cached.lock().await = Some(token);
    }

    /// Drop the cached token so the next call refreshes.
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    async fn refresh(&self) -> Result<AccessToken, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, self.cookie.clone());

        let response = self.http.get(&self.url, headers).await.map_err(|source| {
            tracing::debug!(url = %self.url, error = %source, "Session request failed");
            AuthError::Transport {
                url: self.url.clone(),
                source,
            }
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(AuthError::BodyRead)?;
        tracing::debug!(url = %self.url, %status, len = body.len(), "Session response");

        if status != StatusCode::OK {
            return Err(AuthError::Status { status });
        }

        let token = parse_session(&body)?;
        tracing::debug!(expires_at = ?token.expires_at(), "Refreshed access token");
        Ok(token)
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Parse a session body into an access token.
///
/// Checks run in order: valid JSON, non-empty token, empty error field.
fn parse_session(body: &[u8]) -> Result<AccessToken, AuthError> {
    let session: SessionResponse =
        serde_json::from_slice(body).map_err(|source| AuthError::Decode {
            source,
            body: String::from_utf8_lossy(body).into_owned(),
        })?;

    let token = session.access_token.unwrap_or_default();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    if let Some(message) = session.error
        && !message.is_empty()
    {
        return Err(AuthError::Remote { message });
    }

    AccessToken::new(token, session.expires)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_session() {
        let body = br#"{
            "user": {"id": "user-1", "name": "Ada", "email": "ada@example.com", "groups": [], "features": []},
            "expires": "2030-01-02T03:04:05.000Z",
            "accessToken": "eyJhbGciOi"
        }"#;
        let token = parse_session(body).unwrap();
        assert_eq!(token.token(), "eyJhbGciOi");
        assert_eq!(
            token.expires_at(),
            Some(Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap())
        );
    }

    #[test]
    fn test_parse_session_without_expiry() {
        let token = parse_session(br#"{"accessToken":"tok"}"#).unwrap();
        assert!(token.expires_at().is_none());
        assert!(token.is_expired());
    }

    #[test]
    fn test_parse_session_invalid_json() {
        let err = parse_session(b"<html>Just a moment...</html>").unwrap_err();
        assert!(matches!(err, AuthError::Decode { ref body, .. } if body.starts_with("<html>")));
    }

    #[test]
    fn test_parse_session_empty_object() {
        assert!(matches!(parse_session(b"{}"), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_parse_session_null_token() {
        assert!(matches!(
            parse_session(br#"{"accessToken":null}"#),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_parse_session_missing_token_checked_first() {
        let err = parse_session(br#"{"error":"RefreshAccessTokenError"}"#).unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[test]
    fn test_parse_session_error_field() {
        let err =
            parse_session(br#"{"accessToken":"tok","error":"RefreshAccessTokenError"}"#).unwrap_err();
        assert!(matches!(err, AuthError::Remote { ref message } if message == "RefreshAccessTokenError"));
    }

    #[test]
    fn test_parse_session_empty_error_field() {
        assert!(parse_session(br#"{"accessToken":"tok","error":""}"#).is_ok());
    }

    #[test]
    fn test_parse_session_bad_expiry() {
        assert!(matches!(
            parse_session(br#"{"accessToken":"tok","expires":"tomorrow"}"#),
            Err(AuthError::Decode { .. })
        ));
    }
}
