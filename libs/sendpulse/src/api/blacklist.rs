//! Email blacklist operations.
//!
//! The endpoint takes the address list as one base64-coded, comma-joined
//! string.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// All blacklisted addresses.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get_black_list(&self) -> Result<Value, ApiError> {
        self.get("blacklist", None).await
    }

    /// Add addresses to the blacklist.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty list; otherwise see
    /// [`request`](Self::request).
    pub async fn add_to_black_list(
        &self,
        emails: &[String],
        comment: Option<&str>,
    ) -> Result<Value, ApiError> {
        if emails.is_empty() {
            return Err(ApiError::MissingArgument("emails"));
        }
        let mut payload = json!({ "emails": BASE64.encode(emails.join(",")) });
        if let Some(comment) = comment {
            payload["comment"] = Value::String(comment.to_owned());
        }
        self.post("blacklist", Some(&payload)).await
    }

    /// Remove addresses from the blacklist.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty list; otherwise see
    /// [`request`](Self::request).
    pub async fn remove_from_black_list(&self, emails: &[String]) -> Result<Value, ApiError> {
        if emails.is_empty() {
            return Err(ApiError::MissingArgument("emails"));
        }
        self.delete(
            "blacklist",
            Some(&json!({ "emails": BASE64.encode(emails.join(",")) })),
        )
        .await
    }
}
