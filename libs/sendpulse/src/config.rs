use std::fmt;

use url::Url;

use crate::error::ApiError;
use crate::secret::SecretString;
use sendpulse_http::HttpClientConfig;

/// Production API base URL.
pub const API_BASE_URL: &str = "https://api.sendpulse.com/";

/// Configuration for [`ApiClient`](crate::ApiClient).
///
/// `Debug` is manually implemented to redact
/// [`client_secret`](Self::client_secret).
pub struct ClientConfig {
    // ---- credentials --------------------------------------------------------
    /// API client identifier (`ID` on the SendPulse settings page).
    pub client_id: String,

    /// API client secret (redacted in `Debug` output).
    pub client_secret: SecretString,

    // ---- endpoints ----------------------------------------------------------
    /// API base URL. Override only for tests against a mock server.
    pub base_url: Url,

    // ---- HTTP client --------------------------------------------------------
    /// Override for the internal HTTP client configuration.
    /// When `None`, [`HttpClientConfig::default()`] is used.
    pub http: Option<HttpClientConfig>,
}

impl ClientConfig {
    /// Create a configuration for the production API.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret),
            base_url: Url::parse(API_BASE_URL).expect("static base URL parses"),
            http: None,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if `client_id` or `client_secret` is
    /// empty, or if `base_url` cannot serve as a join base.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.client_id.trim().is_empty() {
            return Err(ApiError::Config("client_id must not be empty".into()));
        }
        if self.client_secret.expose().trim().is_empty() {
            return Err(ApiError::Config("client_secret must not be empty".into()));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "base_url '{}' cannot serve as an API base",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl Clone for ClientConfig {
    fn clone(&self) -> Self {
        Self {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            base_url: self.base_url.clone(),
            http: self.http.clone(),
        }
    }
}

/// `Debug` redacts `client_secret` to prevent accidental exposure in logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("http", &self.http)
            .finish()
    }
}
