//! SMS campaign and phone list operations.

use serde_json::{Map, Value, json};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Merge `params` and `additional` on top of `base`; later keys win.
fn merged(base: Value, params: &Map<String, Value>, additional: Option<&Map<String, Value>>) -> Value {
    let mut object = base.as_object().cloned().unwrap_or_default();
    for (key, value) in params {
        object.insert(key.clone(), value.clone());
    }
    if let Some(additional) = additional {
        for (key, value) in additional {
            object.insert(key.clone(), value.clone());
        }
    }
    Value::Object(object)
}

impl ApiClient {
    /// Add phone numbers to an address book.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty list; otherwise see
    /// [`request`](Self::request).
    pub async fn add_phones(&self, book_id: u64, phones: &[String]) -> Result<Value, ApiError> {
        if phones.is_empty() {
            return Err(ApiError::MissingArgument("phones"));
        }
        self.post(
            "sms/numbers",
            Some(&json!({ "addressBookId": book_id, "phones": phones })),
        )
        .await
    }

    /// Add phone numbers with per-number variables to an address book.
    ///
    /// `phones` maps a number to its variable list, as the endpoint expects.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty map; otherwise see
    /// [`request`](Self::request).
    pub async fn add_phones_with_variables(
        &self,
        book_id: u64,
        phones: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        if phones.is_empty() {
            return Err(ApiError::MissingArgument("phones"));
        }
        self.post(
            "sms/numbers/variables",
            Some(&json!({ "addressBookId": book_id, "phones": phones })),
        )
        .await
    }

    /// Update variables on existing phone numbers.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for empty phones or variables; otherwise
    /// see [`request`](Self::request).
    pub async fn update_phone_variables(
        &self,
        book_id: u64,
        phones: &[String],
        variables: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        if phones.is_empty() {
            return Err(ApiError::MissingArgument("phones"));
        }
        if variables.is_empty() {
            return Err(ApiError::MissingArgument("variables"));
        }
        self.put(
            "sms/numbers",
            Some(&json!({
                "addressBookId": book_id,
                "phones": phones,
                "variables": variables,
            })),
        )
        .await
    }

    /// Delete phone numbers from an address book.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty list; otherwise see
    /// [`request`](Self::request).
    pub async fn delete_phones(&self, book_id: u64, phones: &[String]) -> Result<Value, ApiError> {
        if phones.is_empty() {
            return Err(ApiError::MissingArgument("phones"));
        }
        self.delete(
            "sms/numbers",
            Some(&json!({ "addressBookId": book_id, "phones": phones })),
        )
        .await
    }

    /// Information about one phone number in a book.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty number; otherwise see
    /// [`request`](Self::request).
    pub async fn get_phone_info(&self, book_id: u64, phone: &str) -> Result<Value, ApiError> {
        if phone.trim().is_empty() {
            return Err(ApiError::MissingArgument("phone"));
        }
        self.get(&format!("sms/numbers/info/{book_id}/{phone}"), None).await
    }

    /// Add phone numbers to the SMS blacklist.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty list; otherwise see
    /// [`request`](Self::request).
    pub async fn add_phones_to_blacklist(
        &self,
        phones: &[String],
        comment: Option<&str>,
    ) -> Result<Value, ApiError> {
        if phones.is_empty() {
            return Err(ApiError::MissingArgument("phones"));
        }
        let mut payload = json!({ "phones": phones });
        if let Some(comment) = comment {
            payload["description"] = Value::String(comment.to_owned());
        }
        self.post("sms/black_list", Some(&payload)).await
    }

    /// Remove phone numbers from the SMS blacklist.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty list; otherwise see
    /// [`request`](Self::request).
    pub async fn remove_phones_from_blacklist(&self, phones: &[String]) -> Result<Value, ApiError> {
        if phones.is_empty() {
            return Err(ApiError::MissingArgument("phones"));
        }
        self.delete("sms/black_list", Some(&json!({ "phones": phones })))
            .await
    }

    /// Blacklisted phone numbers.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get_phones_from_blacklist(&self) -> Result<Value, ApiError> {
        self.get("sms/black_list", None).await
    }

    /// Create an SMS campaign over the phones of an address book.
    ///
    /// `params` carries the campaign fields (`body`, `sender`, …);
    /// `additional` is merged on top.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for empty params; otherwise see
    /// [`request`](Self::request).
    pub async fn send_sms_by_book(
        &self,
        book_id: u64,
        params: &Map<String, Value>,
        additional: Option<&Map<String, Value>>,
    ) -> Result<Value, ApiError> {
        if params.is_empty() {
            return Err(ApiError::MissingArgument("params"));
        }
        let payload = merged(json!({ "addressBookId": book_id }), params, additional);
        self.post("sms/campaigns", Some(&payload)).await
    }

    /// Create an SMS campaign over an explicit phone list.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for empty phones or params; otherwise
    /// see [`request`](Self::request).
    pub async fn send_sms_by_list(
        &self,
        phones: &[String],
        params: &Map<String, Value>,
        additional: Option<&Map<String, Value>>,
    ) -> Result<Value, ApiError> {
        if phones.is_empty() {
            return Err(ApiError::MissingArgument("phones"));
        }
        if params.is_empty() {
            return Err(ApiError::MissingArgument("params"));
        }
        let payload = merged(json!({ "phones": phones }), params, additional);
        self.post("sms/send", Some(&payload)).await
    }

    /// List SMS campaigns, optionally filtered by a date range.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn list_sms_campaigns(
        &self,
        params: Option<&Map<String, Value>>,
    ) -> Result<Value, ApiError> {
        let params = params.map(|p| Value::Object(p.clone()));
        self.get("sms/campaigns/list", params.as_ref()).await
    }

    /// Information about one SMS campaign.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get_sms_campaign_info(&self, campaign_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("sms/campaigns/info/{campaign_id}"), None).await
    }

    /// Cancel a scheduled SMS campaign.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn cancel_sms_campaign(&self, campaign_id: u64) -> Result<Value, ApiError> {
        self.put(&format!("sms/campaigns/cancel/{campaign_id}"), None).await
    }

    /// Cost estimate for an SMS campaign over a book or a phone list.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for empty params; otherwise see
    /// [`request`](Self::request).
    pub async fn get_sms_campaign_cost(
        &self,
        params: &Map<String, Value>,
        additional: Option<&Map<String, Value>>,
    ) -> Result<Value, ApiError> {
        if params.is_empty() {
            return Err(ApiError::MissingArgument("params"));
        }
        let payload = merged(json!({}), params, additional);
        self.get("sms/campaigns/cost", Some(&payload)).await
    }

    /// Delete an SMS campaign.
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn delete_sms_campaign(&self, campaign_id: u64) -> Result<Value, ApiError> {
        self.delete("sms/campaigns", Some(&json!({ "id": campaign_id })))
            .await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::test_support::seeded_client;
    use httpmock::prelude::*;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn add_phones_posts_book_and_list() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/sms/numbers").json_body(json!({
                "addressBookId": 8,
                "phones": ["+12025550100"],
            }));
            then.status(200).json_body(json!({"result": true}));
        });

        let client = seeded_client(&server, "tok").await;
        client
            .add_phones(8, &["+12025550100".to_owned()])
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn send_by_book_merges_params_and_additional() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/sms/campaigns").json_body(json!({
                "addressBookId": 8,
                "body": "hello",
                "sender": "ACME",
                "transliterate": 1,
            }));
            then.status(200).json_body(json!({"campaign_id": 5}));
        });

        let client = seeded_client(&server, "tok").await;
        client
            .send_sms_by_book(
                8,
                &map(json!({"body": "hello", "sender": "ACME"})),
                Some(&map(json!({"transliterate": 1}))),
            )
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn campaign_info_path_carries_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/sms/campaigns/info/31");
            then.status(200).json_body(json!({"id": 31}));
        });

        let client = seeded_client(&server, "tok").await;
        client.get_sms_campaign_info(31).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn cancel_uses_put() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT).path("/sms/campaigns/cancel/31");
            then.status(200).json_body(json!({"result": true}));
        });

        let client = seeded_client(&server, "tok").await;
        client.cancel_sms_campaign(31).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn empty_phone_list_is_rejected_locally() {
        let server = MockServer::start();
        let client = seeded_client(&server, "tok").await;

        let err = client.add_phones(8, &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingArgument("phones")));
    }
}
