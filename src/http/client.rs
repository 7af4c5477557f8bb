//! HTTP client wrapper that presents requests the way a browser session would.

use crate::auth::BuildError;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use std::time::Duration;

/// Default per-request timeout, applied to the session and conversation requests alike.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Origin the web app is served from. The access gate checks it on every request.
const WEB_ORIGIN: &str = "https://chat.openai.com";
const WEB_REFERER: &str = "https://chat.openai.com/chat";
const WEB_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const ASSISTANT_APP_ID: &str = "x-openai-assistant-app-id";

/// HTTP client carrying the browser-mimicking default headers.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct WebClient {
    client: reqwest::Client,
}

impl WebClient {
    /// Create a client that sends `user_agent` and the fixed browser headers
    /// with every request and gives each request at most `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, BuildError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(browser_headers(user_agent)?)
            .build()?;

        Ok(Self { client })
    }

    /// Issue a GET request with extra headers.
    pub async fn get(&self, url: &str, headers: HeaderMap) -> reqwest::Result<reqwest::Response> {
        self.client.get(url).headers(headers).send().await
    }

    /// Issue a POST request with an already-encoded body.
    pub async fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> reqwest::Result<reqwest::Response> {
        self.client.post(url).headers(headers).body(body).send().await
    }
}

/// Headers every request carries.
fn browser_headers(user_agent: &str) -> Result<HeaderMap, BuildError> {
    let mut headers = HeaderMap::new();
    let user_agent = HeaderValue::from_str(user_agent)
        .map_err(|_| BuildError::InvalidHeader { field: "user_agent" })?;
    headers.insert(USER_AGENT, user_agent);
    headers.insert(
        HeaderName::from_static(ASSISTANT_APP_ID),
        HeaderValue::from_static(""),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(WEB_ACCEPT_LANGUAGE));
    headers.insert(ORIGIN, HeaderValue::from_static(WEB_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(WEB_REFERER));
    Ok(headers)
}
