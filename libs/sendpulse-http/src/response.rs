use bytes::Bytes;
use http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// Upper bound on the body preview captured into
/// [`HttpError::HttpStatus`] for non-2xx responses.
pub(crate) const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// HTTP response wrapper with body-reading helpers.
///
/// Provides a reqwest-like API for reading response bodies:
/// - `resp.error_for_status()?` — check status without reading the body
/// - `resp.bytes().await?` — read raw bytes
/// - `resp.checked_bytes().await?` — read bytes with status check
/// - `resp.json::<T>().await?` — parse as JSON with status check
///
/// All body reads enforce the configured `max_body_size` limit.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<Incoming>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    /// Get the response status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Get the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// Check status and return an error for non-2xx responses.
    ///
    /// Does NOT read the response body; the resulting
    /// [`HttpError::HttpStatus`] carries an empty preview.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::HttpStatus` if the response status is not 2xx.
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.inner.status().is_success() {
            return Ok(self);
        }

        let content_type = content_type_of(self.inner.headers());
        Err(HttpError::HttpStatus {
            status: self.inner.status(),
            body_preview: String::new(),
            content_type,
        })
    }

    /// Read the response body as bytes without a status check.
    ///
    /// # Errors
    /// Returns `HttpError::BodyTooLarge` if the body exceeds the limit.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        read_body_limited(self.inner, self.max_body_size).await
    }

    /// Read the response body as bytes with a status check.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` (with a bounded body preview) if the
    /// status is not 2xx, `HttpError::BodyTooLarge` if the body exceeds the
    /// limit.
    pub async fn checked_bytes(self) -> Result<Bytes, HttpError> {
        checked_body(self.inner, self.max_body_size).await
    }

    /// Parse the response body as JSON with a status check.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if the status is not 2xx,
    /// `HttpError::BodyTooLarge` if the body exceeds the limit,
    /// `HttpError::Json` if parsing fails.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body_bytes = checked_body(self.inner, self.max_body_size).await?;
        let value = serde_json::from_slice(&body_bytes)?;
        Ok(value)
    }

    /// Read the response body as text (UTF-8) with a status check.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement
    /// character.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` if the status is not 2xx,
    /// `HttpError::BodyTooLarge` if the body exceeds the limit.
    pub async fn text(self) -> Result<String, HttpError> {
        let body_bytes = checked_body(self.inner, self.max_body_size).await?;
        Ok(String::from_utf8_lossy(&body_bytes).into_owned())
    }
}

fn content_type_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Read a body up to `limit` bytes; non-2xx statuses become
/// `HttpError::HttpStatus` carrying a bounded preview of the body.
async fn checked_body(response: Response<Incoming>, max_body_size: usize) -> Result<Bytes, HttpError> {
    let status = response.status();
    let content_type = content_type_of(response.headers());

    if !status.is_success() {
        let preview_limit = max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
        let body_preview = match read_body_limited(response, preview_limit).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(HttpError::BodyTooLarge { .. }) => "<body too large for preview>".to_owned(),
            Err(e) => return Err(e),
        };

        return Err(HttpError::HttpStatus {
            status,
            body_preview,
            content_type,
        });
    }

    read_body_limited(response, max_body_size).await
}

/// Collect the body frame by frame, failing once `limit` is exceeded.
async fn read_body_limited(response: Response<Incoming>, limit: usize) -> Result<Bytes, HttpError> {
    let (_parts, body) = response.into_parts();

    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::from)?;
        if let Some(chunk) = frame.data_ref() {
            if collected.len() + chunk.len() > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(Bytes::from(collected))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::HttpClientBuilder;
    use crate::error::HttpError;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_client() -> crate::HttpClient {
        HttpClientBuilder::new().allow_insecure_http().build().unwrap()
    }

    #[tokio::test]
    async fn json_parses_body() {
        #[derive(serde::Deserialize)]
        struct TestResponse {
            name: String,
            value: i32,
        }

        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/json");
            then.status(200).json_body(json!({"name": "test", "value": 42}));
        });

        let client = test_client();
        let url = format!("{}/json", server.base_url());
        let data: TestResponse = client.get(&url).send().await.unwrap().json().await.unwrap();

        assert_eq!(data.name, "test");
        assert_eq!(data.value, 42);
    }

    #[tokio::test]
    async fn text_reads_utf8() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/text");
            then.status(200).body("Hello, World!");
        });

        let client = test_client();
        let url = format!("{}/text", server.base_url());
        let text = client.get(&url).send().await.unwrap().text().await.unwrap();

        assert_eq!(text, "Hello, World!");
    }

    #[tokio::test]
    async fn non_2xx_becomes_http_status_error_with_preview() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"error": "not found"}"#);
        });

        let client = test_client();
        let url = format!("{}/missing", server.base_url());
        let result: Result<serde_json::Value, _> =
            client.get(&url).send().await.unwrap().json().await;

        match result {
            Err(HttpError::HttpStatus {
                status,
                body_preview,
                content_type,
            }) => {
                assert_eq!(status, http::StatusCode::NOT_FOUND);
                assert!(body_preview.contains("not found"));
                assert_eq!(content_type.as_deref(), Some("application/json"));
            }
            other => panic!("expected HttpStatus error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_for_status_passes_2xx() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/ok");
            then.status(200).body("fine");
        });

        let client = test_client();
        let url = format!("{}/ok", server.base_url());
        let resp = client.get(&url).send().await.unwrap();
        let body = resp.error_for_status().unwrap().bytes().await.unwrap();

        assert_eq!(&body[..], b"fine");
    }

    #[tokio::test]
    async fn error_for_status_rejects_5xx_without_reading_body() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/boom");
            then.status(500).body("internal");
        });

        let client = test_client();
        let url = format!("{}/boom", server.base_url());
        let err = client
            .get(&url)
            .send()
            .await
            .unwrap()
            .error_for_status()
            .unwrap_err();

        assert!(
            matches!(err, HttpError::HttpStatus { status, ref body_preview, .. }
                if status == http::StatusCode::INTERNAL_SERVER_ERROR && body_preview.is_empty())
        );
    }

    #[tokio::test]
    async fn empty_body_reads_as_empty_bytes() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/empty");
            then.status(204);
        });

        let client = test_client();
        let url = format!("{}/empty", server.base_url());
        let body = client
            .get(&url)
            .send()
            .await
            .unwrap()
            .checked_bytes()
            .await
            .unwrap();

        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn oversized_error_body_preview_is_capped() {
        let server = MockServer::start();
        let large_body = "x".repeat(super::ERROR_BODY_PREVIEW_LIMIT + 1000);
        let _m = server.mock(|when, then| {
            when.method(GET).path("/error-large");
            then.status(500).body(&large_body);
        });

        let client = test_client();
        let url = format!("{}/error-large", server.base_url());
        let err = client
            .get(&url)
            .send()
            .await
            .unwrap()
            .checked_bytes()
            .await
            .unwrap_err();

        match err {
            HttpError::HttpStatus {
                status,
                body_preview,
                ..
            } => {
                assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body_preview, "<body too large for preview>");
            }
            other => panic!("expected HttpStatus, got: {other:?}"),
        }
    }
}
