//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the dependency container handed to every request handler.
//! The processor client is built once at startup and passed in here; there is no
//! process-wide singleton.

use async_trait::async_trait;
use gocardless::{
    CreatePaymentRequest, CreateRedirectFlowRequest, GoCardlessClient, GoCardlessError,
    PaymentLinks, PrefilledCustomer,
};
use std::sync::Arc;

use crate::kernel::{
    BasePaymentProcessor, CompletedRedirectFlow, HostedRedirectFlow, PaymentRequest,
    ProcessorError, RedirectFlowRequest,
};

/// Path the processor sends customers back to after the hosted form.
pub const CONFIRM_REDIRECT_FLOW_PATH: &str = "/api/confirm-redirect-flow";

// =============================================================================
// GoCardlessClient Adapter (implements BasePaymentProcessor trait)
// =============================================================================

/// Wrapper around GoCardlessClient that implements BasePaymentProcessor trait
pub struct GoCardlessAdapter(pub Arc<GoCardlessClient>);

impl GoCardlessAdapter {
    pub fn new(client: Arc<GoCardlessClient>) -> Self {
        Self(client)
    }
}

impl From<GoCardlessError> for ProcessorError {
    fn from(err: GoCardlessError) -> Self {
        match err {
            GoCardlessError::Api {
                status,
                message,
                body,
            } => ProcessorError::Rejected {
                status,
                message,
                body,
            },
            other => ProcessorError::Unreachable(other.to_string()),
        }
    }
}

#[async_trait]
impl BasePaymentProcessor for GoCardlessAdapter {
    async fn create_redirect_flow(
        &self,
        request: RedirectFlowRequest,
    ) -> Result<HostedRedirectFlow, ProcessorError> {
        let params = CreateRedirectFlowRequest {
            description: request.description,
            session_token: request.session_token,
            success_redirect_url: request.success_redirect_url,
            prefilled_customer: PrefilledCustomer {
                given_name: Some(request.customer_name),
                email: Some(request.customer_email),
                ..Default::default()
            },
        };

        let flow = self.0.create_redirect_flow(&params).await?;
        let redirect_url = flow.redirect_url.ok_or_else(|| {
            ProcessorError::Unreachable(format!(
                "redirect flow {} was created without a redirect_url",
                flow.id
            ))
        })?;

        Ok(HostedRedirectFlow {
            id: flow.id,
            redirect_url,
        })
    }

    async fn complete_redirect_flow(
        &self,
        redirect_flow_id: &str,
        session_token: &str,
    ) -> Result<CompletedRedirectFlow, ProcessorError> {
        let flow = self
            .0
            .complete_redirect_flow(redirect_flow_id, session_token)
            .await?;

        Ok(CompletedRedirectFlow {
            id: flow.id,
            mandate_id: flow.links.mandate,
            customer_id: flow.links.customer,
        })
    }

    async fn create_payment(
        &self,
        request: PaymentRequest,
        idempotency_key: &str,
    ) -> Result<serde_json::Value, ProcessorError> {
        let params = CreatePaymentRequest {
            amount: request.amount,
            currency: request.currency,
            links: PaymentLinks {
                mandate: request.mandate_id,
            },
        };

        Ok(self.0.create_payment(&params, Some(idempotency_key)).await?)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Fixed parts of every redirect flow request
#[derive(Debug, Clone)]
pub struct RedirectSettings {
    /// Shown to the customer on the hosted page
    pub description: String,
    pub success_redirect_url: String,
}

impl RedirectSettings {
    pub fn new(base_url: &str, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            success_redirect_url: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                CONFIRM_REDIRECT_FLOW_PATH
            ),
        }
    }
}

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub processor: Arc<dyn BasePaymentProcessor>,
    pub redirect: RedirectSettings,
}

impl ServerDeps {
    pub fn new(processor: Arc<dyn BasePaymentProcessor>, redirect: RedirectSettings) -> Self {
        Self {
            processor,
            redirect,
        }
    }
}
