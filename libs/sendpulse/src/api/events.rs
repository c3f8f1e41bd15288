//! Automation360 event triggers addressed by event name.
//!
//! For the hash-addressed, unauthenticated gateway see
//! [`Automation360`](crate::Automation360).

use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Trigger an Automation360 flow by event name.
    ///
    /// The variables must identify a contact through an `email` or `phone`
    /// key.
    ///
    /// # Errors
    /// [`ApiError::MissingArgument`] for an empty name or a variable set
    /// without contact keys; otherwise see [`request`](Self::request).
    pub async fn start_event_automation360(
        &self,
        event_name: &str,
        variables: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        if event_name.trim().is_empty() {
            return Err(ApiError::MissingArgument("event_name"));
        }
        if !variables.contains_key("email") && !variables.contains_key("phone") {
            return Err(ApiError::MissingArgument("email or phone"));
        }
        self.post(
            &format!("events/name/{event_name}"),
            Some(&Value::Object(variables.clone())),
        )
        .await
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::test_support::seeded_client;
    use httpmock::prelude::*;
    use serde_json::json;

    fn vars(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn event_posts_variables_to_named_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/events/name/order_placed")
                .json_body(json!({"email": "a@b.c", "total": 120}));
            then.status(200).json_body(json!({"result": true}));
        });

        let client = seeded_client(&server, "tok").await;
        client
            .start_event_automation360(
                "order_placed",
                &vars(json!({"email": "a@b.c", "total": 120})),
            )
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn contact_key_is_required() {
        let server = MockServer::start();
        let client = seeded_client(&server, "tok").await;

        let err = client
            .start_event_automation360("order_placed", &vars(json!({"total": 120})))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingArgument("email or phone")));
    }

    #[tokio::test]
    async fn event_name_is_required() {
        let server = MockServer::start();
        let client = seeded_client(&server, "tok").await;

        let err = client
            .start_event_automation360("", &vars(json!({"email": "a@b.c"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingArgument("event_name")));
    }
}
