//! Error types for the GoCardless client.

use thiserror::Error;

/// Result type for GoCardless client operations.
pub type Result<T> = std::result::Result<T, GoCardlessError>;

/// GoCardless client errors.
#[derive(Debug, Error)]
pub enum GoCardlessError {
    /// Invalid client options (unknown environment, bad base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// An id that could not have been issued by the processor. Nothing was sent.
    #[error("Invalid resource id: {0:?}")]
    InvalidResourceId(String),

    /// Network error (connection refused, timeout, TLS)
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `body` is the processor's error payload as received.
    #[error("GoCardless API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: serde_json::Value,
    },

    /// 2xx response whose body did not have the expected shape
    #[error("Unexpected GoCardless response: {0}")]
    Decode(String),
}

impl GoCardlessError {
    /// Build an `Api` error from a raw response body.
    ///
    /// GoCardless wraps failures as `{"error": {"message": ..., "type": ..., ...}}`.
    /// Bodies that are not JSON are kept as a JSON string.
    pub fn from_response(status: u16, raw: &str) -> Self {
        let body: serde_json::Value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));

        let message = body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("request failed with status {}", status));

        GoCardlessError::Api {
            status,
            message,
            body,
        }
    }

    /// The processor's error body, if this error came from the processor.
    pub fn processor_body(&self) -> Option<&serde_json::Value> {
        match self {
            GoCardlessError::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}
