use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::storage::StorageError;
use sendpulse_http::HttpError;

/// Errors surfaced by [`ApiClient`](crate::ApiClient).
///
/// Every failure carries enough structured context to diagnose it without
/// re-running the request; secrets never appear in the formatted output.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The client configuration is unusable (empty credentials, bad base
    /// URL). Construction aborts with this error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Token acquisition failed, either at construction (fatal for the
    /// client being built) or mid-session after a 401 replay (fatal for that
    /// request only).
    #[error("authentication failed: {reason}")]
    Authentication {
        /// Human-readable failure description.
        reason: String,
        /// HTTP status of the rejecting response, when one was received.
        status: Option<StatusCode>,
        /// Decoded error body, when the server sent one.
        body: Option<Value>,
    },

    /// The API answered with a non-2xx status (other than the handled
    /// 401-replay case). Never retried automatically.
    #[error("request failed with HTTP {status}")]
    Request {
        /// Response status code.
        status: StatusCode,
        /// Decoded JSON error body, if the response carried one.
        body: Option<Value>,
        /// Raw response headers, one `name: value` pair per line.
        headers: String,
    },

    /// Connection, timeout, or TLS failure below the HTTP layer. Not retried
    /// by the client; callers may retry at a higher level.
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    /// A required endpoint argument was empty. Raised before any network
    /// call is attempted.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    /// A token storage backend failed in a way that had to surface.
    #[error("token storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Status code of the failing response, when the error carries one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Request { status, .. } => Some(*status),
            Self::Authentication { status, .. } => *status,
            _ => None,
        }
    }

    /// Decoded response body of the failing response, when present.
    #[must_use]
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            Self::Request { body, .. } | Self::Authentication { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}
