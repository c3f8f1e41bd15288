use std::time::Duration;

/// Default User-Agent string for HTTP requests
pub const DEFAULT_USER_AGENT: &str = concat!("sendpulse-http/", env!("CARGO_PKG_VERSION"));

/// Transport security mode for outbound connections.
///
/// `TlsOnly` is the default: plain-`http` URLs are rejected with
/// [`HttpError::InvalidScheme`](crate::error::HttpError::InvalidScheme).
/// `AllowInsecureHttp` exists for tests against local mock servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportSecurity {
    /// Only `https` URLs are accepted.
    #[default]
    TlsOnly,
    /// `http` URLs are accepted in addition to `https`.
    ///
    /// Use only for local testing — traffic is not encrypted.
    AllowInsecureHttp,
}

/// Configuration for [`HttpClient`](crate::HttpClient).
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// TCP connect timeout (default: 15 s).
    pub connect_timeout: Duration,

    /// Timeout for a whole request, from send to response head
    /// (default: 30 s). Raise it for attachment-heavy uploads.
    pub request_timeout: Duration,

    /// `User-Agent` header applied when the request does not set one.
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 10 MiB).
    pub max_body_size: usize,

    /// How long an idle pooled connection is kept (default: 90 s).
    pub pool_idle_timeout: Option<Duration>,

    /// Maximum idle pooled connections per host (default: 32).
    pub pool_max_idle_per_host: usize,

    /// URL scheme policy.
    pub transport: TransportSecurity,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_body_size: 10 * 1024 * 1024,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
            transport: TransportSecurity::TlsOnly,
        }
    }
}

impl HttpClientConfig {
    /// Configuration preset for tests against a local mock server:
    /// plain HTTP allowed, short timeouts.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(5),
            transport: TransportSecurity::AllowInsecureHttp,
            ..Default::default()
        }
    }
}
