//! Email campaign operations.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Parameters for [`ApiClient::create_campaign`].
///
/// The message body is base64-coded on the wire, as the endpoint requires;
/// pass it here as plain text.
#[derive(Debug, Clone)]
pub struct CreateCampaign {
    /// Sender display name.
    pub sender_name: String,
    /// Sender email address (must be a verified sender).
    pub sender_email: String,
    /// Message subject.
    pub subject: String,
    /// Message body (plain, not yet base64-coded).
    pub body: String,
    /// Address book to send to.
    pub list_id: u64,
    /// Optional campaign name shown in the UI.
    pub name: Option<String>,
    /// Optional attachments, file name to content.
    pub attachments: HashMap<String, String>,
    /// Optional campaign type.
    pub campaign_type: Option<String>,
}

impl CreateCampaign {
    /// A campaign with only the required fields set.
    pub fn new(
        sender_name: impl Into<String>,
        sender_email: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        list_id: u64,
    ) -> Self {
        Self {
            sender_name: sender_name.into(),
            sender_email: sender_email.into(),
            subject: subject.into(),
            body: body.into(),
            list_id,
            name: None,
            attachments: HashMap::new(),
            campaign_type: None,
        }
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.sender_name.trim().is_empty() {
            return Err(ApiError::MissingArgument("sender_name"));
        }
        if self.sender_email.trim().is_empty() {
            return Err(ApiError::MissingArgument("sender_email"));
        }
        if self.subject.trim().is_empty() {
            return Err(ApiError::MissingArgument("subject"));
        }
        if self.body.trim().is_empty() {
            return Err(ApiError::MissingArgument("body"));
        }
        Ok(())
    }

    fn into_payload(self) -> Value {
        let mut payload = json!({
            "sender_name": self.sender_name,
            "sender_email": self.sender_email,
            "subject": self.subject,
            "body": BASE64.encode(self.body),
            "list_id": self.list_id,
        });
        let object = payload.as_object_mut().expect("payload is an object");
        if let Some(name) = self.name {
            object.insert("name".to_owned(), Value::String(name));
        }
        if !self.attachments.is_empty() {
            object.insert("attachments".to_owned(), json!(self.attachments));
        }
        if let Some(campaign_type) = self.campaign_type {
            object.insert("type".to_owned(), Value::String(campaign_type));
        }
        payload
    }
}

impl ApiClient {
    /// List campaigns.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn list_campaigns(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.get("campaigns", Some(&json!({ "limit": limit, "offset": offset })))
            .await
    }

    /// Information about one campaign.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get_campaign_info(&self, id: u64) -> Result<Value, ApiError> {
        self.get(&format!("campaigns/{id}"), None).await
    }

    /// Campaign statistics grouped by country.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn campaign_stat_by_countries(&self, id: u64) -> Result<Value, ApiError> {
        self.get(&format!("campaigns/{id}/countries"), None).await
    }

    /// Campaign statistics grouped by referral source.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn campaign_stat_by_referrals(&self, id: u64) -> Result<Value, ApiError> {
        self.get(&format!("campaigns/{id}/referrals"), None).await
    }

    /// Create a campaign over an address book.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] when a required field is empty;
    /// otherwise see [`request`](Self::request).
    pub async fn create_campaign(&self, campaign: CreateCampaign) -> Result<Value, ApiError> {
        campaign.validate()?;
        self.post("campaigns", Some(&campaign.into_payload())).await
    }

    /// Cancel a scheduled campaign.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn cancel_campaign(&self, id: u64) -> Result<Value, ApiError> {
        self.delete(&format!("campaigns/{id}"), None).await
    }
}
