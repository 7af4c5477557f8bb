//! Session credentials and the access token they are exchanged for.

use super::error::{AuthError, BuildError};
use chrono::{DateTime, Utc};
use reqwest::header::HeaderValue;

const CLEARANCE_COOKIE: &str = "cf_clearance";
const SESSION_COOKIE: &str = "__Secure-next-auth.session-token";

/// Long-lived browser session credentials.
///
/// Immutable once constructed; every field is guaranteed non-empty.
#[derive(Clone)]
pub struct Credentials {
    session_token: String,
    clearance_token: String,
    user_agent: String,
}

impl Credentials {
    /// Validate and bundle the session credentials.
    ///
    /// Fails if any of the three values is empty.
    pub fn new(
        session_token: impl Into<String>,
        clearance_token: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Result<Self, BuildError> {
        let credentials = Self {
            session_token: session_token.into(),
            clearance_token: clearance_token.into(),
            user_agent: user_agent.into(),
        };

        for (field, value) in [
            ("session_token", &credentials.session_token),
            ("clearance_token", &credentials.clearance_token),
            ("user_agent", &credentials.user_agent),
        ] {
            if value.is_empty() {
                return Err(BuildError::MissingField { field });
            }
        }

        Ok(credentials)
    }

    /// User agent the session was established with.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Cookie header for the session endpoint: both cookies.
    pub(crate) fn session_cookie(&self) -> Result<HeaderValue, BuildError> {
        let cookie = format!(
            "{CLEARANCE_COOKIE}={}; {SESSION_COOKIE}={}",
            self.clearance_token, self.session_token
        );
        sensitive_header(&cookie, "session_token")
    }

    /// Cookie header for the conversation endpoint: the clearance cookie only.
    pub(crate) fn clearance_cookie(&self) -> Result<HeaderValue, BuildError> {
        sensitive_header(
            &format!("{CLEARANCE_COOKIE}={}", self.clearance_token),
            "clearance_token",
        )
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("session_token", &"[REDACTED]")
            .field("clearance_token", &"[REDACTED]")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn sensitive_header(value: &str, field: &'static str) -> Result<HeaderValue, BuildError> {
    let mut header =
        HeaderValue::from_str(value).map_err(|_| BuildError::InvalidHeader { field })?;
    header.set_sensitive(true);
    Ok(header)
}

/// Short-lived bearer token obtained from the session endpoint.
#[derive(Clone)]
pub struct AccessToken {
    token: String,
    expires_at: Option<DateTime<Utc>>,
    authorization: HeaderValue,
}

impl AccessToken {
    /// Wrap a token and its declared expiry.
    ///
    /// A token without an expiry is treated as already expired.
    pub fn new(
        token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self, AuthError> {
        let token = token.into();
        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| AuthError::InvalidToken)?;
        authorization.set_sensitive(true);

        Ok(Self {
            token,
            expires_at,
            authorization,
        })
    }

    /// The raw bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Declared expiry, if the session endpoint sent one.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Check if the token must be refreshed before use.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against an explicit clock reading.
    ///
    /// Empty tokens and tokens without an expiry always count as expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() {
            return true;
        }
        self.expires_at.is_none_or(|expires_at| now >= expires_at)
    }

    /// `Authorization` header value for this token.
    pub(crate) fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
