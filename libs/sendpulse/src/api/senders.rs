//! Sender address management.

use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List registered senders.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn list_senders(&self) -> Result<Value, ApiError> {
        self.get("senders", None).await
    }

    /// Register a new sender.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for empty name or email; otherwise see
    /// [`request`](Self::request).
    pub async fn add_sender(&self, name: &str, email: &str) -> Result<Value, ApiError> {
        if name.trim().is_empty() {
            return Err(ApiError::MissingArgument("name"));
        }
        if email.trim().is_empty() {
            return Err(ApiError::MissingArgument("email"));
        }
        self.post("senders", Some(&json!({ "email": email, "name": name })))
            .await
    }

    /// Remove a sender.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty email; otherwise see
    /// [`request`](Self::request).
    pub async fn remove_sender(&self, email: &str) -> Result<Value, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::MissingArgument("email"));
        }
        self.delete("senders", Some(&json!({ "email": email }))).await
    }

    /// Activate a sender with the emailed code.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for empty email or code; otherwise see
    /// [`request`](Self::request).
    pub async fn activate_sender(&self, email: &str, code: &str) -> Result<Value, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::MissingArgument("email"));
        }
        if code.trim().is_empty() {
            return Err(ApiError::MissingArgument("code"));
        }
        self.post(&format!("senders/{email}/code"), Some(&json!({ "code": code })))
            .await
    }

    /// Ask for the activation code to be re-sent.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty email; otherwise see
    /// [`request`](Self::request).
    pub async fn get_sender_activation_mail(&self, email: &str) -> Result<Value, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::MissingArgument("email"));
        }
        self.get(&format!("senders/{email}/code"), None).await
    }
}
