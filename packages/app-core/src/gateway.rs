//! Typed client for the direct debit gateway.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct RedirectFlowStarted {
    /// Open this in a browser for the customer to enter bank details
    pub redirect_url: String,
    pub redirect_flow_id: String,
    /// Keep until the flow is confirmed
    pub session_token: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Mandate {
    pub mandate_id: String,
    pub customer_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentOrder {
    /// Minor currency units
    pub amount: u64,
    pub currency: String,
    pub mandate_id: String,
    /// Reuse when retrying the same payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_nonce: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.post(&url).json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let raw = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&raw)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(raw);
            tracing::warn!(%url, status = status.as_u16(), %message, "Gateway request failed");
            return Err(AppError::Gateway {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json::<T>().await?)
    }

    pub async fn start_redirect_flow(&self, name: &str, email: &str) -> Result<RedirectFlowStarted> {
        self.post(
            "/api/start-redirect-flow",
            &serde_json::json!({ "name": name, "email": email }),
        )
        .await
    }

    pub async fn confirm_redirect_flow(
        &self,
        redirect_flow_id: &str,
        session_token: &str,
    ) -> Result<Mandate> {
        self.post(
            "/api/confirm-redirect-flow",
            &serde_json::json!({
                "redirect_flow_id": redirect_flow_id,
                "session_token": session_token,
            }),
        )
        .await
    }

    /// Returns the processor's payment object as the gateway relayed it.
    pub async fn create_payment(&self, order: &PaymentOrder) -> Result<serde_json::Value> {
        self.post("/api/create-payment", order).await
    }
}
