#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! HTTP transport for the SendPulse API client
//!
//! This crate provides a hyper-based HTTP client with:
//! - Automatic TLS via rustls (HTTPS only by default)
//! - Connection pooling
//! - Bounded connect and request timeouts
//! - Response body size limits
//! - User-Agent header injection
//!
//! It deliberately performs **no automatic retries**: retry policy belongs to
//! the request dispatcher layered on top of this crate, which replays a
//! request at most once after refreshing credentials.
//!
//! # Example
//!
//! ```ignore
//! use sendpulse_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("my-app/1.0")
//!     .build()?;
//!
//! let data: MyData = client
//!     .get("https://example.com/api")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;

pub use client::{HttpClient, HttpClientBuilder};
pub use config::{DEFAULT_USER_AGENT, HttpClientConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use request::RequestBuilder;
pub use response::HttpResponse;
