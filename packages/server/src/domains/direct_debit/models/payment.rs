use serde::Deserialize;
use uuid::Uuid;

use crate::common::generate_idempotency_key;
use crate::domains::direct_debit::DirectDebitError;

/// Input for creating a payment against a mandate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePayment {
    /// Minor currency units (pence, cents)
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub mandate_id: String,
    /// Caller-chosen value identifying one logical payment. Resending the same
    /// nonce with the same mandate, amount and currency never charges twice.
    #[serde(default)]
    pub idempotency_nonce: Option<String>,
}

/// A validated payment request
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub amount: u64,
    pub currency: String,
    pub mandate_id: String,
    pub nonce: String,
}

impl CreatePayment {
    pub fn validate(self) -> Result<PaymentIntent, DirectDebitError> {
        if self.amount <= 0 {
            return Err(DirectDebitError::validation(
                "amount must be a positive integer in minor currency units",
            ));
        }

        let currency = self.currency.trim();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DirectDebitError::validation(format!(
                "'{}' is not an ISO 4217 currency code",
                currency
            )));
        }

        let mandate_id = self.mandate_id.trim();
        if mandate_id.is_empty() {
            return Err(DirectDebitError::validation("mandate_id is required"));
        }

        // No nonce: every request is its own intent, as before idempotency existed.
        let nonce = self
            .idempotency_nonce
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(PaymentIntent {
            amount: self.amount as u64,
            currency: currency.to_ascii_uppercase(),
            mandate_id: mandate_id.to_string(),
            nonce,
        })
    }
}

impl PaymentIntent {
    pub fn idempotency_key(&self) -> String {
        generate_idempotency_key(&self.mandate_id, self.amount, &self.currency, &self.nonce)
    }
}
