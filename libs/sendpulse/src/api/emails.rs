//! Account-wide email address operations.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Account-wide information about an email address.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty email; otherwise see
    /// [`request`](Self::request).
    pub async fn get_email_global_info(&self, email: &str) -> Result<Value, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::MissingArgument("email"));
        }
        self.get(&format!("emails/{email}"), None).await
    }

    /// Remove an email address from every address book.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty email; otherwise see
    /// [`request`](Self::request).
    pub async fn remove_email_from_all_books(&self, email: &str) -> Result<Value, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::MissingArgument("email"));
        }
        self.delete(&format!("emails/{email}"), None).await
    }

    /// Per-campaign statistics for an email address.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty email; otherwise see
    /// [`request`](Self::request).
    pub async fn email_stat_by_campaigns(&self, email: &str) -> Result<Value, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::MissingArgument("email"));
        }
        self.get(&format!("emails/{email}/campaigns"), None).await
    }
}
