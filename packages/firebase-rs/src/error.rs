//! Error types for the Firebase client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FirebaseError>;

#[derive(Debug, Error)]
pub enum FirebaseError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the provider's error code, e.g. `EMAIL_EXISTS`.
    #[error("Firebase API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected Firebase response: {0}")]
    Decode(String),
}

impl FirebaseError {
    /// Parse the `{"error": {"code": .., "message": ..}}` shape shared by
    /// Identity Toolkit and Firestore.
    pub fn from_response(status: u16, raw: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(raw)
            .ok()
            .and_then(|body| {
                body.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("request failed with status {}", status));

        FirebaseError::Api { status, message }
    }

    /// Provider error code for `Api` errors.
    pub fn code(&self) -> Option<&str> {
        match self {
            // Identity Toolkit appends detail after the code: "WEAK_PASSWORD : Password should be..."
            FirebaseError::Api { message, .. } => message.split(" : ").next(),
            _ => None,
        }
    }
}
