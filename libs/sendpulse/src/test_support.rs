//! Shared helpers for the crate's mock-server tests.

use std::sync::Arc;

use httpmock::prelude::*;
use url::Url;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::storage::{SessionStorage, TokenStorage};
use sendpulse_http::HttpClientConfig;

/// Config pointing at the mock server with test-grade HTTP settings.
pub(crate) fn test_config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::new("u1", "s1");
    config.base_url = Url::parse(&format!("{}/", server.base_url())).unwrap();
    config.http = Some(HttpClientConfig::for_testing());
    config
}

/// Mock the token endpoint to hand out `token`.
pub(crate) fn mock_token<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
    let body = format!(r#"{{"access_token":"{token}","token_type":"Bearer","expires_in":3600}}"#);
    server.mock(move |when, then| {
        when.method(POST).path("/oauth/access_token");
        then.status(200)
            .header("content-type", "application/json")
            .body(&body);
    })
}

/// Build a client whose storage is pre-seeded with `token`, so construction
/// makes no network calls.
pub(crate) async fn seeded_client(server: &MockServer, token: &str) -> ApiClient {
    let storage = SessionStorage::new();
    let config = test_config(server);
    let key = crate::auth::token_cache_key(&config.client_id, &config.client_secret);
    storage.set(&key, token).await.unwrap();
    ApiClient::new(config, Arc::new(storage)).await.unwrap()
}
