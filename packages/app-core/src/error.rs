//! Error types for the app core.

use firebase::FirebaseError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Form input rejected before any remote call. The message is shown to the user as-is.
    #[error("{0}")]
    Validation(String),

    #[error("Identity provider error: {0}")]
    Identity(#[source] FirebaseError),

    #[error("Profile store error: {0}")]
    Profile(#[source] FirebaseError),

    /// The gateway answered with a non-2xx status; `message` is its `error` field.
    #[error("Gateway error ({status}): {message}")]
    Gateway { status: u16, message: String },

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Credential storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Provider error code (e.g. `INVALID_PASSWORD`) for identity and profile failures.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            AppError::Identity(e) | AppError::Profile(e) => e.code(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
