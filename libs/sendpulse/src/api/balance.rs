//! Account balance.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Account balance, optionally converted to a currency (e.g. `"USD"`).
    ///
    /// # Errors
    /// See [`request`](Self::request).
    pub async fn get_balance(&self, currency: Option<&str>) -> Result<Value, ApiError> {
        let path = match currency {
            Some(currency) if !currency.trim().is_empty() => {
                format!("balance/{}", currency.to_uppercase())
            }
            _ => "balance".to_owned(),
        };
        self.get(&path, None).await
    }
}
