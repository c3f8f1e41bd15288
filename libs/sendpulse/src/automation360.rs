use serde_json::{Map, Value};
use url::Url;

use crate::error::ApiError;
use sendpulse_http::{HttpClient, HttpClientBuilder, HttpClientConfig};

/// Base URL of the Automation360 event gateway.
pub const EVENTS_BASE_URL: &str = "https://events.sendpulse.com/events/id/";

/// Standalone Automation360 event pusher.
///
/// Events are addressed by an opaque event hash and need no `OAuth2`
/// authentication, so this client is independent of [`ApiClient`] and its
/// token machinery. For the name-addressed, authenticated variant see
/// [`ApiClient::start_event_automation360`].
///
/// [`ApiClient`]: crate::ApiClient
/// [`ApiClient::start_event_automation360`]: crate::ApiClient::start_event_automation360
pub struct Automation360 {
    http: HttpClient,
    event_url: Url,
}

impl std::fmt::Debug for Automation360 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Automation360")
            .field("event_url", &self.event_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Automation360 {
    /// Create a pusher for the given event hash against the production
    /// gateway.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] for an empty hash and
    /// [`ApiError::Transport`] if the HTTP client fails to initialize.
    pub fn new(event_hash: &str) -> Result<Self, ApiError> {
        let base = Url::parse(EVENTS_BASE_URL).expect("static base URL parses");
        Self::with_config(event_hash, base, HttpClientConfig::default())
    }

    /// Create a pusher against a custom gateway URL, e.g. a mock server.
    ///
    /// # Errors
    ///
    /// Same conditions as [`new`](Self::new).
    pub fn with_config(
        event_hash: &str,
        base_url: Url,
        http: HttpClientConfig,
    ) -> Result<Self, ApiError> {
        if event_hash.trim().is_empty() {
            return Err(ApiError::Config("event hash must not be empty".into()));
        }

        let event_url = base_url
            .join(event_hash)
            .map_err(|e| ApiError::Config(format!("invalid event hash: {e}")))?;
        let http = HttpClientBuilder::with_config(http).build()?;

        Ok(Self { http, event_url })
    }

    /// Trigger the event with the given contact and variables.
    ///
    /// At least one of `email` and `phone` is required; both are merged into
    /// the variables object before sending.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingArgument`] when both contact fields are absent,
    /// [`ApiError::Request`] for non-2xx answers, [`ApiError::Transport`]
    /// below the HTTP layer.
    pub async fn send_event(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        variables: Map<String, Value>,
    ) -> Result<Value, ApiError> {
        if email.is_none_or(str::is_empty) && phone.is_none_or(str::is_empty) {
            return Err(ApiError::MissingArgument("email or phone"));
        }

        let mut payload = variables;
        if let Some(email) = email {
            payload.insert("email".to_owned(), Value::String(email.to_owned()));
        }
        if let Some(phone) = phone {
            payload.insert("phone".to_owned(), Value::String(phone.to_owned()));
        }

        let response = self
            .http
            .post(self.event_url.as_str())
            .header("accept", "application/json")
            .json(&Value::Object(payload))?
            .send()
            .await?;

        let status = response.status();
        let headers = crate::client::format_headers(response.headers());
        let bytes = response.bytes().await?;
        let body = crate::client::decode_body(&bytes);

        if !status.is_success() {
            return Err(ApiError::Request {
                status,
                body,
                headers,
            });
        }
        Ok(body.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_pusher(server: &MockServer, hash: &str) -> Automation360 {
        Automation360::with_config(
            hash,
            Url::parse(&format!("{}/events/id/", server.base_url())).unwrap(),
            HttpClientConfig::for_testing(),
        )
        .unwrap()
    }

    #[test]
    fn empty_hash_is_rejected() {
        let err = Automation360::new("").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[tokio::test]
    async fn event_posts_merged_variables() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/events/id/abc123")
                .json_body(json!({"email": "a@b.c", "order_id": 7}));
            then.status(200).json_body(json!({"result": true}));
        });

        let pusher = test_pusher(&server, "abc123");
        let mut vars = Map::new();
        vars.insert("order_id".to_owned(), json!(7));
        let result = pusher.send_event(Some("a@b.c"), None, vars).await.unwrap();

        assert_eq!(result, json!({"result": true}));
        mock.assert();
    }

    #[tokio::test]
    async fn missing_contact_fails_before_network() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path_includes("/events/id/");
            then.status(200);
        });

        let pusher = test_pusher(&server, "abc123");
        let err = pusher.send_event(None, None, Map::new()).await.unwrap_err();

        assert!(matches!(err, ApiError::MissingArgument("email or phone")));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn gateway_error_surfaces_as_request_error() {
        let server = MockServer::start();
        let _mock = server.mock(|when, then| {
            when.method(POST).path("/events/id/abc123");
            then.status(400).json_body(json!({"message": "bad event"}));
        });

        let pusher = test_pusher(&server, "abc123");
        let err = pusher
            .send_event(None, Some("+123456789"), Map::new())
            .await
            .unwrap_err();

        match err {
            ApiError::Request { status, body, .. } => {
                assert_eq!(status, http::StatusCode::BAD_REQUEST);
                assert_eq!(body, Some(json!({"message": "bad event"})));
            }
            other => panic!("expected Request error, got: {other}"),
        }
    }
}
