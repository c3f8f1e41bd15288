use serde::Deserialize;
use serde_json::Value;
use url::Url;
use xxhash_rust::xxh3::xxh3_128;
use zeroize::Zeroizing;

use crate::error::ApiError;
use crate::secret::SecretString;
use sendpulse_http::HttpClient;

/// Path of the `OAuth2` token endpoint, relative to the API base.
pub(crate) const TOKEN_PATH: &str = "oauth/access_token";

/// Deserialized token endpoint response.
///
/// Only the fields required by the client credentials flow are included;
/// unknown fields are silently ignored.
///
/// **Intentionally `Deserialize`-only** — `Serialize` is not derived to
/// prevent accidental serialization of access tokens into logs or error
/// messages.
#[derive(Deserialize)]
struct TokenResponse {
    /// The access token issued by the authorization server.
    access_token: String,
    /// The type of the token issued (optional; must be "Bearer" if present).
    #[serde(default)]
    token_type: Option<String>,
}

/// Deterministic cache key for the credential pair.
///
/// Same credentials always map to the same key, so repeated client
/// constructions share one cached token. The concatenation buffer is scrubbed
/// on drop.
pub(crate) fn token_cache_key(client_id: &str, client_secret: &SecretString) -> String {
    let material = Zeroizing::new(format!("{client_id}::{}", client_secret.expose()));
    format!("{:032x}", xxh3_128(material.as_bytes()))
}

/// Exchange client credentials for a bearer token.
///
/// Sends `grant_type=client_credentials` as a form body to the fixed token
/// path under `base_url`, without attaching any existing bearer token.
///
/// # Errors
///
/// Returns [`ApiError::Authentication`] when the endpoint answers anything
/// but HTTP 200 with a parseable `access_token`, and
/// [`ApiError::Transport`] when the exchange fails below the HTTP layer.
pub(crate) async fn request_token(
    http: &HttpClient,
    base_url: &Url,
    client_id: &str,
    client_secret: &SecretString,
) -> Result<SecretString, ApiError> {
    let token_url = base_url
        .join(TOKEN_PATH)
        .map_err(|e| ApiError::Config(format!("cannot build token URL: {e}")))?;

    // Credentials travel in the form body; wrap the temporary copy in
    // `Zeroizing` so it is scrubbed on drop.
    let secret_expose = Zeroizing::new(client_secret.expose().to_owned());
    let fields: [(&str, &str); 3] = [
        ("grant_type", "client_credentials"),
        ("client_id", client_id),
        ("client_secret", &secret_expose),
    ];

    let response = http
        .post(token_url.as_str())
        .header("accept", "application/json")
        .form(&fields)?
        .send()
        .await?;

    let status = response.status();
    let body = response.bytes().await?;

    if status != http::StatusCode::OK {
        let decoded: Option<Value> = serde_json::from_slice(&body).ok();
        tracing::warn!(%status, "token endpoint rejected the credentials");
        return Err(ApiError::Authentication {
            reason: format!("token endpoint answered HTTP {status}"),
            status: Some(status),
            body: decoded,
        });
    }

    let token_response: TokenResponse =
        serde_json::from_slice(&body).map_err(|e| ApiError::Authentication {
            reason: format!("token endpoint returned an unparseable body: {e}"),
            status: Some(status),
            body: None,
        })?;

    if let Some(token_type) = &token_response.token_type {
        if !token_type.eq_ignore_ascii_case("bearer") {
            return Err(ApiError::Authentication {
                reason: format!("unsupported token type: {token_type}"),
                status: Some(status),
                body: None,
            });
        }
    }

    if token_response.access_token.is_empty() {
        return Err(ApiError::Authentication {
            reason: "token endpoint returned an empty access_token".into(),
            status: Some(status),
            body: None,
        });
    }

    Ok(SecretString::new(token_response.access_token))
}
