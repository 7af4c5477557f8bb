use crate::client::ChatGpt;
use crate::error::{Error, Result};
use crate::options::{ClientOptions, Endpoints};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Value of the `__Secure-next-auth.session-token` cookie.
    pub session_token: Option<String>,
    /// Value of the `cf_clearance` cookie.
    pub clearance_token: Option<String>,
    /// User agent of the browser the cookies were taken from. The clearance
    /// cookie is bound to it.
    pub user_agent: Option<String>,
    /// Per-request timeout in seconds. Default: 10.
    pub timeout_secs: u64,
    pub model: Option<String>,
    /// Serve both endpoints from another origin (proxies, tests).
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_token: None,
            clearance_token: None,
            user_agent: None,
            timeout_secs: 10,
            model: None,
            base_url: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Config")
            .field("session_token", &redact(&self.session_token))
            .field("clearance_token", &redact(&self.clearance_token))
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chatgpt-web").join("config.toml"))
    }

    /// Load the default config file, or defaults if it doesn't exist.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load an explicit config file. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        if config.timeout_secs == 0 {
            return Err(Error::Config(format!(
                "timeout_secs must be positive in {}",
                path.display()
            )));
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Client options described by this config. Missing credentials are
    /// reported when the client is built.
    pub fn client_options(&self) -> ClientOptions {
        let mut options = ClientOptions::new(
            self.session_token.clone().unwrap_or_default(),
            self.clearance_token.clone().unwrap_or_default(),
            self.user_agent.clone().unwrap_or_default(),
        )
        .with_timeout(self.timeout());

        if let Some(base_url) = self.base_url.as_deref() {
            options = options.with_endpoints(Endpoints::with_base_url(base_url));
        }
        if let Some(model) = self.model.as_deref() {
            options = options.with_model(model);
        }
        options
    }

    /// Build a client from this config.
    pub fn connect(&self) -> Result<ChatGpt> {
        Ok(ChatGpt::new(self.client_options())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BuildError;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.session_token.is_none());
    }

    #[test]
    fn test_load_from() {
        let file = write_config(
            r#"
session_token = "sess"
clearance_token = "clear"
user_agent = "Mozilla/5.0"
timeout_secs = 30
base_url = "http://127.0.0.1:9000"
"#,
        );
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.session_token.as_deref(), Some("sess"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.model.is_none());

        let options = config.client_options();
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            options.endpoints.session_url,
            "http://127.0.0.1:9000/api/auth/session"
        );
        assert!(config.connect().is_ok());
    }

    #[test]
    fn test_load_from_partial_uses_defaults() {
        let file = write_config("model = \"gpt-4\"\n");
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.client_options().model.as_deref(), Some("gpt-4"));
        assert_eq!(config.client_options().endpoints, Endpoints::default());
    }

    #[test]
    fn test_load_from_zero_timeout() {
        let file = write_config("timeout_secs = 0\n");
        assert!(matches!(Config::load_from(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let file = write_config("session_token = \n");
        assert!(matches!(Config::load_from(file.path()), Err(Error::Toml(_))));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_connect_without_credentials() {
        let result = Config::default().connect();
        assert!(matches!(
            result,
            Err(Error::Build(BuildError::MissingField {
                field: "session_token"
            }))
        ));
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let config = Config {
            session_token: Some("secret".into()),
            ..Config::default()
        };
        assert!(!format!("{config:?}").contains("secret"));
    }
}
