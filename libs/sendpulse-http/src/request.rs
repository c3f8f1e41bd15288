use bytes::Bytes;
use http_body_util::Full;
use serde::Serialize;

use crate::client::HttpClient;
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::HttpResponse;

/// Body type for the request builder
#[derive(Clone, Debug)]
enum BodyKind {
    /// Empty body
    Empty,
    /// Raw bytes body
    Bytes(Bytes),
    /// JSON-serialized body (stored as bytes after serialization)
    Json(Bytes),
    /// Form URL-encoded body (stored as bytes after serialization)
    Form(Bytes),
}

/// HTTP request builder with fluent API.
///
/// Created by [`HttpClient::get`], [`HttpClient::post`], etc. Supports
/// chaining headers and body configuration before sending with
/// [`send()`](RequestBuilder::send).
///
/// Query parameters must be encoded into the URL externally (e.g. via
/// `url::Url`); this crate does not compose query strings.
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    client: HttpClient,
    method: http::Method,
    url: String,
    headers: Vec<(http::header::HeaderName, http::header::HeaderValue)>,
    body: BodyKind,
    /// Error captured during building (deferred to `send()`)
    error: Option<HttpError>,
}

impl RequestBuilder {
    pub(crate) fn new(client: HttpClient, method: http::Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: Vec::new(),
            body: BodyKind::Empty,
            error: None,
        }
    }

    /// Add a single header to the request.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }

        match (
            http::header::HeaderName::try_from(name),
            http::header::HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.push((name, value));
            }
            (Err(e), _) => {
                self.error = Some(HttpError::InvalidHeaderName(e));
            }
            (_, Err(e)) => {
                self.error = Some(HttpError::InvalidHeaderValue(e));
            }
        }
        self
    }

    /// Add multiple headers to the request.
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        for (name, value) in headers {
            self = self.header(&name, &value);
        }
        self
    }

    /// Set request body as JSON.
    ///
    /// Serializes the value using `serde_json` and sets `Content-Type:
    /// application/json` unless a Content-Type header was already provided.
    ///
    /// # Errors
    ///
    /// Returns `Err(HttpError::Json)` if serialization fails.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let json_bytes = serde_json::to_vec(body)?;
        self.body = BodyKind::Json(Bytes::from(json_bytes));
        Ok(self)
    }

    /// Set request body as form URL-encoded.
    ///
    /// Serializes the fields and sets `Content-Type:
    /// application/x-www-form-urlencoded` unless a Content-Type header was
    /// already provided.
    ///
    /// # Errors
    ///
    /// Returns `Err(HttpError::FormEncode)` if encoding fails.
    pub fn form(mut self, fields: &[(&str, &str)]) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let form_string = serde_urlencoded::to_string(fields)?;
        self.body = BodyKind::Form(Bytes::from(form_string));
        Ok(self)
    }

    /// Set request body as raw bytes. The caller is responsible for setting
    /// a matching Content-Type header.
    pub fn body_bytes(mut self, body: Bytes) -> Self {
        self.body = BodyKind::Bytes(body);
        self
    }

    /// Send the request.
    ///
    /// Returns `Ok(HttpResponse)` for **all** HTTP statuses, including
    /// 4xx/5xx; status classification is the caller's concern (or use
    /// [`HttpResponse::error_for_status`]). `Err` is reserved for build,
    /// transport, TLS, and timeout failures.
    ///
    /// # Errors
    ///
    /// Any error captured while building (invalid header, bad URL) is
    /// surfaced here, followed by transport-level failures.
    pub async fn send(self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let uri = validate_uri(&self.url, self.client.config.transport)?;

        let mut builder = http::Request::builder().method(self.method.clone()).uri(uri);

        let mut has_user_agent = false;
        let mut has_content_type = false;
        for (name, value) in &self.headers {
            if name == http::header::USER_AGENT {
                has_user_agent = true;
            }
            if name == http::header::CONTENT_TYPE {
                has_content_type = true;
            }
            builder = builder.header(name, value);
        }

        if !has_user_agent {
            builder = builder.header(
                http::header::USER_AGENT,
                self.client.config.user_agent.as_str(),
            );
        }

        let body_bytes = match self.body {
            BodyKind::Empty => Bytes::new(),
            BodyKind::Bytes(b) => b,
            BodyKind::Json(b) => {
                if !has_content_type {
                    builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                }
                b
            }
            BodyKind::Form(b) => {
                if !has_content_type {
                    builder = builder
                        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                }
                b
            }
        };

        let request = builder.body(Full::new(body_bytes))?;

        tracing::debug!(method = %self.method, url = %self.url, "sending request");

        let timeout = self.client.config.request_timeout;
        let response = tokio::time::timeout(timeout, self.client.inner.request(request))
            .await
            .map_err(|_| HttpError::Timeout(timeout))??;

        Ok(HttpResponse {
            inner: response,
            max_body_size: self.client.config.max_body_size,
        })
    }
}

/// Parse and validate a request URL against the transport security mode.
fn validate_uri(url: &str, transport: TransportSecurity) -> Result<http::Uri, HttpError> {
    let uri: http::Uri = url.parse().map_err(|e: http::uri::InvalidUri| {
        HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::ParseError,
            reason: e.to_string(),
        }
    })?;

    let Some(scheme) = uri.scheme_str() else {
        return Err(HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::MissingScheme,
            reason: "URL must carry an http or https scheme".to_owned(),
        });
    };

    if uri.authority().is_none() {
        return Err(HttpError::InvalidUri {
            url: url.to_owned(),
            kind: InvalidUriKind::MissingAuthority,
            reason: "URL must carry a host".to_owned(),
        });
    }

    match scheme {
        "https" => Ok(uri),
        "http" if transport == TransportSecurity::AllowInsecureHttp => Ok(uri),
        "http" => Err(HttpError::InvalidScheme {
            scheme: scheme.to_owned(),
            reason: "plain HTTP is disabled; use TransportSecurity::AllowInsecureHttp for tests"
                .to_owned(),
        }),
        other => Err(HttpError::InvalidScheme {
            scheme: other.to_owned(),
            reason: "only http(s) URLs are supported".to_owned(),
        }),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn validate_uri_accepts_https() {
        let uri = validate_uri("https://api.example.com/path", TransportSecurity::TlsOnly);
        assert!(uri.is_ok());
    }

    #[test]
    fn validate_uri_rejects_http_when_tls_only() {
        let err =
            validate_uri("http://api.example.com/path", TransportSecurity::TlsOnly).unwrap_err();
        assert!(matches!(err, HttpError::InvalidScheme { .. }));
    }

    #[test]
    fn validate_uri_allows_http_in_insecure_mode() {
        let uri = validate_uri(
            "http://localhost:8080/path",
            TransportSecurity::AllowInsecureHttp,
        );
        assert!(uri.is_ok());
    }

    #[test]
    fn validate_uri_rejects_missing_scheme() {
        let err = validate_uri("example.com/path", TransportSecurity::TlsOnly).unwrap_err();
        assert!(matches!(
            err,
            HttpError::InvalidUri {
                kind: InvalidUriKind::MissingScheme,
                ..
            } | HttpError::InvalidUri {
                kind: InvalidUriKind::ParseError,
                ..
            }
        ));
    }

    #[test]
    fn validate_uri_rejects_missing_authority() {
        let err = validate_uri("https:///nohost", TransportSecurity::TlsOnly).unwrap_err();
        assert!(matches!(err, HttpError::InvalidUri { .. }));
    }

    #[test]
    fn validate_uri_rejects_other_schemes() {
        let err = validate_uri("ftp://example.com/f", TransportSecurity::TlsOnly).unwrap_err();
        assert!(matches!(err, HttpError::InvalidScheme { ref scheme, .. } if scheme == "ftp"));
    }

    #[tokio::test]
    async fn invalid_header_is_deferred_to_send() {
        let client = crate::HttpClientBuilder::new()
            .allow_insecure_http()
            .build()
            .unwrap();

        let err = client
            .get("http://localhost:1/x")
            .header("bad header name", "v")
            .send()
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::InvalidHeaderName(_)));
    }
}
