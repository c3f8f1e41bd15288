use std::sync::Arc;

use arc_swap::ArcSwapOption;
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use url::Url;

use crate::auth;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::secret::SecretString;
use crate::storage::TokenStorage;
use sendpulse_http::{HttpClient, HttpClientBuilder};

/// Response envelope produced by the dispatcher for successful exchanges.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status of the final attempt.
    pub status: StatusCode,
    /// Decoded JSON body; `None` for empty or non-JSON bodies.
    pub body: Option<Value>,
    /// Raw response headers, one `name: value` pair per line.
    pub headers: String,
}

impl ApiResponse {
    /// The decoded body, with `Null` standing in for an empty one.
    #[must_use]
    pub fn into_json(self) -> Value {
        self.body.unwrap_or(Value::Null)
    }
}

/// SendPulse API client.
///
/// Construction authenticates eagerly: a cached token is adopted from the
/// injected [`TokenStorage`] when one exists under the credential
/// fingerprint, otherwise a token is acquired from the `OAuth2` endpoint and
/// construction fails if that acquisition fails.
///
/// # Thread Safety
///
/// The client is `Send + Sync` and can be shared across tasks. Token state
/// lives in an [`ArcSwapOption`], so reads are lock-free and a refresh
/// atomically swaps in the replacement; the one-shot 401 replay flag is local
/// to each [`request`](Self::request) call. Two concurrent 401s may both
/// refresh, which is harmless (last write wins).
pub struct ApiClient {
    http: HttpClient,
    base_url: Url,
    client_id: String,
    client_secret: SecretString,
    cache_key: String,
    storage: Arc<dyn TokenStorage>,
    token: ArcSwapOption<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client and make sure it holds a usable token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] for empty credentials,
    /// [`ApiError::Authentication`] when no token is cached and the token
    /// endpoint rejects the credentials, and [`ApiError::Transport`] when
    /// the endpoint is unreachable.
    pub async fn new(
        config: ClientConfig,
        storage: Arc<dyn TokenStorage>,
    ) -> Result<Self, ApiError> {
        config.validate()?;

        let http_config = config.http.clone().unwrap_or_default();
        let http = HttpClientBuilder::with_config(http_config).build()?;

        let cache_key = auth::token_cache_key(&config.client_id, &config.client_secret);
        let cached = match storage.get(&cache_key).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "token storage lookup failed; treating as cache miss");
                None
            }
        };

        let client = Self {
            http,
            base_url: config.base_url,
            client_id: config.client_id,
            client_secret: config.client_secret,
            cache_key,
            storage,
            token: ArcSwapOption::from(cached.map(|t| Arc::new(SecretString::new(t)))),
        };

        if client.token.load().is_none() {
            client.refresh_token().await?;
        }

        Ok(client)
    }

    /// Acquire a fresh token, swap it in, and persist it.
    ///
    /// A persistence failure is logged but does not fail the refresh — the
    /// in-memory token is authoritative for this instance.
    async fn refresh_token(&self) -> Result<(), ApiError> {
        let token = auth::request_token(
            &self.http,
            &self.base_url,
            &self.client_id,
            &self.client_secret,
        )
        .await?;

        if let Err(e) = self.storage.set(&self.cache_key, token.expose()).await {
            tracing::warn!(error = %e, "failed to persist refreshed token; keeping it in memory");
        }
        self.token.store(Some(Arc::new(token)));
        Ok(())
    }

    /// Dispatch a request against the API.
    ///
    /// `data` is encoded as query-string parameters for GET/DELETE and as a
    /// JSON body for POST/PUT/PATCH. With `use_token` set, the cached bearer
    /// token is attached; a 401 then triggers exactly one token refresh and
    /// replay — the second attempt's outcome is final.
    ///
    /// # Errors
    ///
    /// [`ApiError::Authentication`] when the replayed request is still
    /// unauthorized (or the refresh itself fails); [`ApiError::Request`] for
    /// any other status ≥ 400; [`ApiError::Transport`] below the HTTP layer.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        data: Option<&Value>,
        use_token: bool,
    ) -> Result<ApiResponse, ApiError> {
        // One-shot replay state, scoped to this call chain.
        let mut retried = false;
        loop {
            let response = self.execute(&method, path, data, use_token).await?;

            if response.status == StatusCode::UNAUTHORIZED && use_token {
                if !retried {
                    retried = true;
                    tracing::debug!(path, "401 received, refreshing token and replaying once");
                    self.refresh_token().await?;
                    continue;
                }
                tracing::warn!(path, "still unauthorized after a token refresh");
                return Err(ApiError::Authentication {
                    reason: "request remained unauthorized after a token refresh".into(),
                    status: Some(response.status),
                    body: response.body,
                });
            }

            if response.status.is_client_error() || response.status.is_server_error() {
                return Err(ApiError::Request {
                    status: response.status,
                    body: response.body,
                    headers: response.headers,
                });
            }

            return Ok(response);
        }
    }

    /// Perform a single HTTP exchange and decode the response envelope.
    async fn execute(
        &self,
        method: &Method,
        path: &str,
        data: Option<&Value>,
        use_token: bool,
    ) -> Result<ApiResponse, ApiError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Config(format!("invalid request path '{path}': {e}")))?;

        let query_encoded = matches!(*method, Method::GET | Method::DELETE);
        if query_encoded {
            if let Some(Value::Object(params)) = data {
                let mut pairs = url.query_pairs_mut();
                for (name, value) in params {
                    if value.is_null() {
                        continue;
                    }
                    pairs.append_pair(name, &query_value(value));
                }
            }
        }

        let mut builder = self
            .http
            .request(method.clone(), url.as_str())
            .header("accept", "application/json");

        if use_token {
            if let Some(token) = self.token.load_full() {
                builder = builder.header("authorization", &format!("Bearer {}", token.expose()));
            }
        }

        if !query_encoded {
            if let Some(body) = data {
                builder = builder.json(body)?;
            }
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = format_headers(response.headers());
        let bytes = response.bytes().await?;

        tracing::debug!(%method, path, %status, "request dispatched");

        Ok(ApiResponse {
            status,
            body: decode_body(&bytes),
            headers,
        })
    }

    // ---- verb facade --------------------------------------------------------

    /// Authenticated GET; `params` become query-string parameters.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get(&self, path: &str, params: Option<&Value>) -> Result<Value, ApiError> {
        self.request(Method::GET, path, params, true)
            .await
            .map(ApiResponse::into_json)
    }

    /// Authenticated POST with a JSON body.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn post(&self, path: &str, data: Option<&Value>) -> Result<Value, ApiError> {
        self.request(Method::POST, path, data, true)
            .await
            .map(ApiResponse::into_json)
    }

    /// Authenticated PUT with a JSON body.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn put(&self, path: &str, data: Option<&Value>) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, data, true)
            .await
            .map(ApiResponse::into_json)
    }

    /// Authenticated PATCH with a JSON body.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn patch(&self, path: &str, data: Option<&Value>) -> Result<Value, ApiError> {
        self.request(Method::PATCH, path, data, true)
            .await
            .map(ApiResponse::into_json)
    }

    /// Authenticated DELETE; `params` become query-string parameters.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn delete(&self, path: &str, params: Option<&Value>) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, params, true)
            .await
            .map(ApiResponse::into_json)
    }
}

/// Render a JSON value as a single query-string parameter value.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        // Nested structures go over the wire as compact JSON.
        other => other.to_string(),
    }
}

/// Render response headers as `name: value` lines.
pub(crate) fn format_headers(headers: &HeaderMap) -> String {
    let mut out = String::new();
    for (name, value) in headers {
        out.push_str(name.as_str());
        out.push_str(": ");
        out.push_str(value.to_str().unwrap_or("<non-ascii>"));
        out.push('\n');
    }
    out
}

/// Decode a response body; empty and non-JSON bodies decode to `None`.
pub(crate) fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "response body is not JSON; dropping it");
            None
        }
    }
}
