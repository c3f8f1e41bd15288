//! Web push notification operations.

use serde_json::{Map, Value, json};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Parameters for [`ApiClient::create_push_task`].
#[derive(Debug, Clone)]
pub struct PushTask {
    /// Notification title.
    pub title: String,
    /// Target website id.
    pub website_id: u64,
    /// Notification body text.
    pub body: String,
    /// Time-to-live in seconds; `0` means no expiry.
    pub ttl: u32,
    /// Additional endpoint parameters (link, icon, segmentation, …) merged
    /// into the payload as-is.
    pub additional: Map<String, Value>,
}

impl PushTask {
    /// A task with only the required fields set.
    pub fn new(title: impl Into<String>, website_id: u64, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            website_id,
            body: body.into(),
            ttl: 0,
            additional: Map::new(),
        }
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::MissingArgument("title"));
        }
        if self.website_id == 0 {
            return Err(ApiError::MissingArgument("website_id"));
        }
        if self.body.trim().is_empty() {
            return Err(ApiError::MissingArgument("body"));
        }
        Ok(())
    }

    fn into_payload(self) -> Value {
        let mut payload = self.additional;
        payload.insert("title".to_owned(), Value::String(self.title));
        payload.insert("website_id".to_owned(), json!(self.website_id));
        payload.insert("body".to_owned(), Value::String(self.body));
        payload.insert("ttl".to_owned(), json!(self.ttl));
        Value::Object(payload)
    }
}

impl ApiClient {
    /// List push campaigns.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn push_list_campaigns(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.get("push/tasks", Some(&json!({ "limit": limit, "offset": offset })))
            .await
    }

    /// Statistics for one push campaign.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get_push_campaign_stat(&self, campaign_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("push/tasks/{campaign_id}"), None).await
    }

    /// List websites registered for push.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn push_list_websites(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.get("push/websites", Some(&json!({ "limit": limit, "offset": offset })))
            .await
    }

    /// Number of websites registered for push.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn push_count_websites(&self) -> Result<Value, ApiError> {
        self.get("push/websites/total", None).await
    }

    /// Variables defined for a website.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn push_list_website_variables(&self, website_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("push/websites/{website_id}/variables"), None)
            .await
    }

    /// Subscriptions of a website.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn push_list_website_subscriptions(
        &self,
        website_id: u64,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value, ApiError> {
        self.get(
            &format!("push/websites/{website_id}/subscriptions"),
            Some(&json!({ "limit": limit, "offset": offset })),
        )
        .await
    }

    /// Number of subscriptions of a website.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn push_count_website_subscriptions(
        &self,
        website_id: u64,
    ) -> Result<Value, ApiError> {
        self.get(&format!("push/websites/{website_id}/subscriptions/total"), None)
            .await
    }

    /// Enable or disable one subscription.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn push_set_subscription_state(
        &self,
        subscription_id: u64,
        enabled: bool,
    ) -> Result<Value, ApiError> {
        self.post(
            "push/subscriptions/state",
            Some(&json!({ "id": subscription_id, "state": u8::from(enabled) })),
        )
        .await
    }

    /// Create a push campaign.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] when title, website or body is missing;
    /// otherwise see [`request`](Self::request).
    pub async fn create_push_task(&self, task: PushTask) -> Result<Value, ApiError> {
        task.validate()?;
        self.post("push/tasks", Some(&task.into_payload())).await
    }

    /// Integration code snippet for a website.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get_push_integration_code(&self, website_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("push/websites/{website_id}/code"), None).await
    }
}
