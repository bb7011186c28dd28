use thiserror::Error;

use crate::kernel::ProcessorError;

/// Failures of the direct debit operations, scoped to one request
#[derive(Error, Debug)]
pub enum DirectDebitError {
    /// Caller input rejected before any processor call
    #[error("{0}")]
    Validation(String),

    /// The processor rejected the request; `body` is its error payload, unchanged
    #[error("{message}")]
    Processor {
        status: u16,
        message: String,
        body: serde_json::Value,
    },

    /// The processor could not be reached or replied with something unusable
    #[error("{0}")]
    Transport(String),
}

impl DirectDebitError {
    pub fn validation(message: impl Into<String>) -> Self {
        DirectDebitError::Validation(message.into())
    }
}

impl From<ProcessorError> for DirectDebitError {
    fn from(err: ProcessorError) -> Self {
        match err {
            ProcessorError::Rejected {
                status,
                message,
                body,
            } => DirectDebitError::Processor {
                status,
                message,
                body,
            },
            ProcessorError::Unreachable(message) => DirectDebitError::Transport(message),
        }
    }
}
