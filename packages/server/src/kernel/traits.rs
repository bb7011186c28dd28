// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (validation, idempotency keys) lives in domain actions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BasePaymentProcessor)

use async_trait::async_trait;
use thiserror::Error;

// =============================================================================
// Payment Processor Trait (Infrastructure - direct debit provider)
// =============================================================================

/// Parameters for a hosted redirect flow.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectFlowRequest {
    pub description: String,
    pub session_token: String,
    pub success_redirect_url: String,
    pub customer_name: String,
    pub customer_email: String,
}

/// A redirect flow the customer has not completed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct HostedRedirectFlow {
    pub id: String,
    pub redirect_url: String,
}

/// A completed redirect flow. Links are `None` if the processor omitted them.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedRedirectFlow {
    pub id: String,
    pub mandate_id: Option<String>,
    pub customer_id: Option<String>,
}

/// Parameters for a one-off payment. `amount` is in minor currency units.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub amount: u64,
    pub currency: String,
    pub mandate_id: String,
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The processor answered with a failure. `body` is its payload, unchanged.
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        body: serde_json::Value,
    },

    /// The processor could not be reached or answered with something unreadable.
    #[error("{0}")]
    Unreachable(String),
}

#[async_trait]
pub trait BasePaymentProcessor: Send + Sync {
    /// Create a hosted flow for the customer to set up a mandate
    async fn create_redirect_flow(
        &self,
        request: RedirectFlowRequest,
    ) -> Result<HostedRedirectFlow, ProcessorError>;

    /// Complete a flow. The processor verifies `session_token` and flow state.
    async fn complete_redirect_flow(
        &self,
        redirect_flow_id: &str,
        session_token: &str,
    ) -> Result<CompletedRedirectFlow, ProcessorError>;

    /// Create a payment, returning the processor's payment object unmodified
    async fn create_payment(
        &self,
        request: PaymentRequest,
        idempotency_key: &str,
    ) -> Result<serde_json::Value, ProcessorError>;
}
