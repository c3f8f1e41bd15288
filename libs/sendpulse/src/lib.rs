#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! SendPulse REST API client.
//!
//! This crate implements the client side of the SendPulse
//! marketing-automation API: `OAuth2` client-credentials authentication with
//! pluggable token storage, a request dispatcher with a single automatic
//! re-authentication on 401, and the endpoint catalog (mailing lists,
//! campaigns, SMTP, push, SMS, event automation).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sendpulse::{ApiClient, ClientConfig};
//! use sendpulse::storage::FileStorage;
//!
//! let config = ClientConfig::new("client-id", "client-secret");
//! let storage = Arc::new(FileStorage::new("/var/cache/sendpulse"));
//! let client = ApiClient::new(config, storage).await?;
//!
//! let books = client.list_address_books(Some(10), None).await?;
//! ```
//!
//! Construction performs the initial token acquisition (unless a token is
//! already cached under the credential fingerprint) and fails fast on bad
//! credentials. All further calls re-authenticate at most once when the API
//! answers 401.

mod auth;
mod automation360;
mod client;
mod config;
mod error;
mod secret;

pub mod api;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use automation360::Automation360;
pub use client::{ApiClient, ApiResponse};
pub use config::{API_BASE_URL, ClientConfig};
pub use error::ApiError;
pub use secret::SecretString;

pub use sendpulse_http::{HttpClientConfig, TransportSecurity};
