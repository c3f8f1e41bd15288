//! Mailing list (address book) operations.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::ApiError;

/// One mailing list member, with optional per-subscriber variables.
#[derive(Debug, Clone, Serialize)]
pub struct Subscriber {
    /// Email address.
    pub email: String,
    /// Custom variables attached to the subscriber.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub variables: HashMap<String, Value>,
}

impl Subscriber {
    /// A subscriber with no variables.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            variables: HashMap::new(),
        }
    }
}

impl ApiClient {
    /// Create an address book.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty name; otherwise see
    /// [`request`](Self::request).
    pub async fn create_address_book(&self, book_name: &str) -> Result<Value, ApiError> {
        if book_name.trim().is_empty() {
            return Err(ApiError::MissingArgument("book_name"));
        }
        self.post("addressbooks", Some(&json!({ "bookName": book_name })))
            .await
    }

    /// Rename an address book.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty name; otherwise see
    /// [`request`](Self::request).
    pub async fn edit_address_book(&self, id: u64, new_name: &str) -> Result<Value, ApiError> {
        if new_name.trim().is_empty() {
            return Err(ApiError::MissingArgument("new_name"));
        }
        self.put(&format!("addressbooks/{id}"), Some(&json!({ "name": new_name })))
            .await
    }

    /// Remove an address book.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn remove_address_book(&self, id: u64) -> Result<Value, ApiError> {
        self.delete(&format!("addressbooks/{id}"), None).await
    }

    /// List address books.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn list_address_books(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.get("addressbooks", Some(&json!({ "limit": limit, "offset": offset })))
            .await
    }

    /// Information about one address book.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get_book_info(&self, id: u64) -> Result<Value, ApiError> {
        self.get(&format!("addressbooks/{id}"), None).await
    }

    /// Variables defined on an address book.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get_book_variables(&self, id: u64) -> Result<Value, ApiError> {
        self.get(&format!("addressbooks/{id}/variables"), None).await
    }

    /// List email addresses in a book.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get_emails_from_book(
        &self,
        id: u64,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.get(
            &format!("addressbooks/{id}/emails"),
            Some(&json!({ "limit": limit, "offset": offset })),
        )
        .await
    }

    /// Add subscribers to a book.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty subscriber list; otherwise
    /// see [`request`](Self::request).
    pub async fn add_emails(
        &self,
        book_id: u64,
        emails: &[Subscriber],
    ) -> Result<Value, ApiError> {
        if emails.is_empty() {
            return Err(ApiError::MissingArgument("emails"));
        }
        self.post(
            &format!("addressbooks/{book_id}/emails"),
            Some(&json!({ "emails": emails })),
        )
        .await
    }

    /// Remove email addresses from a book.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty address list; otherwise
    /// see [`request`](Self::request).
    pub async fn remove_emails(
        &self,
        book_id: u64,
        emails: &[String],
    ) -> Result<Value, ApiError> {
        if emails.is_empty() {
            return Err(ApiError::MissingArgument("emails"));
        }
        self.delete(
            &format!("addressbooks/{book_id}/emails"),
            Some(&json!({ "emails": emails })),
        )
        .await
    }

    /// Information about one address inside a book.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty email; otherwise see
    /// [`request`](Self::request).
    pub async fn get_email_info(&self, book_id: u64, email: &str) -> Result<Value, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::MissingArgument("email"));
        }
        self.get(&format!("addressbooks/{book_id}/emails/{email}"), None)
            .await
    }

    /// Cost of a campaign over the given book.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn campaign_cost(&self, book_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("addressbooks/{book_id}/cost"), None).await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::test_support::seeded_client;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn create_posts_book_name() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/addressbooks")
                .json_body(json!({"bookName": "newsletter"}));
            then.status(200).json_body(json!({"id": 10}));
        });

        let client = seeded_client(&server, "tok").await;
        let created = client.create_address_book("newsletter").await.unwrap();

        assert_eq!(created, json!({"id": 10}));
        mock.assert();
    }

    #[tokio::test]
    async fn empty_book_name_fails_before_network() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/addressbooks");
            then.status(200);
        });

        let client = seeded_client(&server, "tok").await;
        let err = client.create_address_book("").await.unwrap_err();

        assert!(matches!(err, ApiError::MissingArgument("book_name")));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn edit_puts_new_name() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/addressbooks/5")
                .json_body(json!({"name": "renamed"}));
            then.status(200).json_body(json!({"result": true}));
        });

        let client = seeded_client(&server, "tok").await;
        client.edit_address_book(5, "renamed").await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn add_emails_serializes_subscribers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/addressbooks/5/emails")
                .json_body(json!({"emails": [{"email": "a@b.c"}]}));
            then.status(200).json_body(json!({"result": true}));
        });

        let client = seeded_client(&server, "tok").await;
        client
            .add_emails(5, &[Subscriber::new("a@b.c")])
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn subscriber_variables_are_sent_when_present() {
        let mut subscriber = Subscriber::new("a@b.c");
        subscriber
            .variables
            .insert("plan".to_owned(), json!("pro"));

        let encoded = serde_json::to_value(&subscriber).unwrap();
        assert_eq!(encoded, json!({"email": "a@b.c", "variables": {"plan": "pro"}}));
    }

    #[tokio::test]
    async fn remove_emails_requires_a_list() {
        let server = MockServer::start();
        let client = seeded_client(&server, "tok").await;

        let err = client.remove_emails(5, &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingArgument("emails")));
    }

    #[tokio::test]
    async fn list_passes_pagination() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/addressbooks")
                .query_param("limit", "10")
                .query_param("offset", "0");
            then.status(200).json_body(json!([]));
        });

        let client = seeded_client(&server, "tok").await;
        client.list_address_books(Some(10), Some(0)).await.unwrap();
        mock.assert();
    }
}
