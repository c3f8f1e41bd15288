//! SMTP relay operations.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::ApiError;

/// A named email address.
#[derive(Debug, Clone, Serialize)]
pub struct EmailAddress {
    /// Display name.
    pub name: String,
    /// Address.
    pub email: String,
}

impl EmailAddress {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A transactional message for [`ApiClient::smtp_send_mail`].
///
/// The html part is base64-coded on the wire; pass it here as plain markup.
#[derive(Debug, Clone)]
pub struct SmtpEmail {
    /// HTML part of the message.
    pub html: String,
    /// Plain-text part of the message.
    pub text: String,
    /// Message subject.
    pub subject: String,
    /// Sender.
    pub from: EmailAddress,
    /// Recipients.
    pub to: Vec<EmailAddress>,
    /// Blind-carbon-copy recipients.
    pub bcc: Vec<EmailAddress>,
    /// Attachments, file name to content.
    pub attachments: HashMap<String, String>,
}

impl SmtpEmail {
    fn validate(&self) -> Result<(), ApiError> {
        if self.subject.trim().is_empty() {
            return Err(ApiError::MissingArgument("subject"));
        }
        if self.from.email.trim().is_empty() {
            return Err(ApiError::MissingArgument("from"));
        }
        if self.to.is_empty() {
            return Err(ApiError::MissingArgument("to"));
        }
        Ok(())
    }

    fn into_payload(self) -> Value {
        let mut email = json!({
            "html": BASE64.encode(self.html),
            "text": self.text,
            "subject": self.subject,
            "from": self.from,
            "to": self.to,
        });
        let object = email.as_object_mut().expect("payload is an object");
        if !self.bcc.is_empty() {
            object.insert("bcc".to_owned(), json!(self.bcc));
        }
        if !self.attachments.is_empty() {
            object.insert("attachments".to_owned(), json!(self.attachments));
        }
        json!({ "email": email })
    }
}

impl ApiClient {
    /// List messages sent through the SMTP relay, with optional filters.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    #[allow(clippy::too_many_arguments)]
    pub async fn smtp_list_emails(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        from_date: Option<&str>,
        to_date: Option<&str>,
        sender: Option<&str>,
        recipient: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.get(
            "smtp/emails",
            Some(&json!({
                "limit": limit,
                "offset": offset,
                "from": from_date,
                "to": to_date,
                "sender": sender,
                "recipient": recipient,
            })),
        )
        .await
    }

    /// Information about one relayed message.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty id; otherwise see
    /// [`request`](Self::request).
    pub async fn smtp_get_email_info_by_id(&self, id: &str) -> Result<Value, ApiError> {
        if id.trim().is_empty() {
            return Err(ApiError::MissingArgument("id"));
        }
        self.get(&format!("smtp/emails/{id}"), None).await
    }

    /// List addresses on the SMTP unsubscribe list.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn smtp_list_unsubscribed(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.get(
            "smtp/unsubscribe",
            Some(&json!({ "limit": limit, "offset": offset })),
        )
        .await
    }

    /// Add addresses to the SMTP unsubscribe list.
    ///
    /// Each entry is an object with `email` and optional `comment`.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty list; otherwise see
    /// [`request`](Self::request).
    pub async fn smtp_unsubscribe_emails(&self, emails: &Value) -> Result<Value, ApiError> {
        if emails.as_array().is_none_or(Vec::is_empty) {
            return Err(ApiError::MissingArgument("emails"));
        }
        self.post("smtp/unsubscribe", Some(&json!({ "emails": emails })))
            .await
    }

    /// Remove addresses from the SMTP unsubscribe list.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty list; otherwise see
    /// [`request`](Self::request).
    pub async fn smtp_remove_from_unsubscribe(&self, emails: &[String]) -> Result<Value, ApiError> {
        if emails.is_empty() {
            return Err(ApiError::MissingArgument("emails"));
        }
        self.delete("smtp/unsubscribe", Some(&json!({ "emails": emails })))
            .await
    }

    /// Dedicated IP addresses of the account.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn smtp_list_ip(&self) -> Result<Value, ApiError> {
        self.get("smtp/ips", None).await
    }

    /// Domains allowed as SMTP senders.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn smtp_list_allowed_domains(&self) -> Result<Value, ApiError> {
        self.get("smtp/domains", None).await
    }

    /// Register a sender domain by a mailbox on it.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty email; otherwise see
    /// [`request`](Self::request).
    pub async fn smtp_add_domain(&self, email: &str) -> Result<Value, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::MissingArgument("email"));
        }
        self.post("smtp/domains", Some(&json!({ "email": email }))).await
    }

    /// Verify a previously registered sender domain.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty email; otherwise see
    /// [`request`](Self::request).
    pub async fn smtp_verify_domain(&self, email: &str) -> Result<Value, ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::MissingArgument("email"));
        }
        self.get(&format!("smtp/domains/{email}"), None).await
    }

    /// Send one transactional message through the relay.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] when subject, sender, or recipients are
    /// missing; otherwise see [`request`](Self::request).
    pub async fn smtp_send_mail(&self, email: SmtpEmail) -> Result<Value, ApiError> {
        email.validate()?;
        self.post("smtp/emails", Some(&email.into_payload())).await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::test_support::seeded_client;
    use httpmock::prelude::*;

    fn sample_email() -> SmtpEmail {
        SmtpEmail {
            html: "<p>Hello!</p>".to_owned(),
            text: "Hello!".to_owned(),
            subject: "Mail subject".to_owned(),
            from: EmailAddress::new("John", "john@example.com"),
            to: vec![EmailAddress::new("Client", "client@example.com")],
            bcc: Vec::new(),
            attachments: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn send_mail_encodes_html_and_wraps_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/smtp/emails").json_body(json!({
                "email": {
                    "html": BASE64.encode("<p>Hello!</p>"),
                    "text": "Hello!",
                    "subject": "Mail subject",
                    "from": {"name": "John", "email": "john@example.com"},
                    "to": [{"name": "Client", "email": "client@example.com"}],
                }
            }));
            then.status(200).json_body(json!({"result": true, "id": "x1"}));
        });

        let client = seeded_client(&server, "tok").await;
        client.smtp_send_mail(sample_email()).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn send_mail_requires_recipients() {
        let server = MockServer::start();
        let client = seeded_client(&server, "tok").await;

        let mut email = sample_email();
        email.to.clear();
        let err = client.smtp_send_mail(email).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingArgument("to")));
    }

    #[tokio::test]
    async fn list_emails_passes_only_set_filters() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/smtp/emails")
                .query_param("limit", "20")
                .query_param("sender", "john@example.com");
            then.status(200).json_body(json!([]));
        });

        let client = seeded_client(&server, "tok").await;
        client
            .smtp_list_emails(Some(20), None, None, None, Some("john@example.com"), None)
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn unsubscribe_takes_structured_entries() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/smtp/unsubscribe").json_body(json!({
                "emails": [{"email": "a@b.c", "comment": "bounced"}]
            }));
            then.status(200).json_body(json!({"result": true}));
        });

        let client = seeded_client(&server, "tok").await;
        client
            .smtp_unsubscribe_emails(&json!([{"email": "a@b.c", "comment": "bounced"}]))
            .await
            .unwrap();
        mock.assert();
    }
}
