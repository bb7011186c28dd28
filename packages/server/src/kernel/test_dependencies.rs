// TestDependencies - mock implementations for testing
//
// Provides an in-memory payment processor that can be injected into ServerDeps for tests.
// It enforces the same redirect flow rules the real processor does, so tests exercise
// token mismatch, replay and unknown-mandate failures without network access.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{
    BasePaymentProcessor, CompletedRedirectFlow, HostedRedirectFlow, PaymentRequest,
    ProcessorError, RedirectFlowRequest, RedirectSettings, ServerDeps,
};

/// Hosted payment pages for the sandbox environment.
pub const MOCK_REDIRECT_BASE: &str = "https://pay-sandbox.gocardless.com/flow/";

const SUPPORTED_CURRENCIES: &[&str] = &["AUD", "CAD", "DKK", "EUR", "GBP", "NZD", "SEK", "USD"];

/// A call made against the mock processor
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorCall {
    CreateRedirectFlow(RedirectFlowRequest),
    CompleteRedirectFlow {
        redirect_flow_id: String,
        session_token: String,
    },
    CreatePayment {
        request: PaymentRequest,
        idempotency_key: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFlowStatus {
    /// Created, customer has not filled in the hosted form
    Pending,
    /// Customer submitted the hosted form, awaiting completion
    Submitted,
    Completed,
}

#[derive(Debug, Clone)]
struct MockFlow {
    session_token: String,
    customer_name: String,
    status: MockFlowStatus,
}

#[derive(Default)]
struct MockState {
    flows: HashMap<String, MockFlow>,
    mandates: HashSet<String>,
    payments_by_key: HashMap<String, serde_json::Value>,
    calls: Vec<ProcessorCall>,
    sequence: u64,
    unreachable: bool,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.sequence += 1;
        format!("{}{:06}", prefix, self.sequence)
    }
}

#[derive(Clone, Default)]
pub struct MockPaymentProcessor {
    state: Arc<Mutex<MockState>>,
}

fn rejection(status: u16, error_type: &str, reason: &str, message: &str) -> ProcessorError {
    ProcessorError::Rejected {
        status,
        message: message.to_string(),
        body: serde_json::json!({
            "error": {
                "message": message,
                "type": error_type,
                "code": status,
                "errors": [{ "reason": reason, "message": message }]
            }
        }),
    }
}

impl MockPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the network were down
    pub fn unreachable(self) -> Self {
        self.state.lock().unwrap().unreachable = true;
        self
    }

    /// Simulate the customer filling in the hosted form.
    /// Returns false if the flow does not exist or is not pending.
    pub fn submit_hosted_form(&self, redirect_flow_id: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        match state.flows.get_mut(redirect_flow_id) {
            Some(flow) if flow.status == MockFlowStatus::Pending => {
                flow.status = MockFlowStatus::Submitted;
                true
            }
            _ => false,
        }
    }

    /// Register a mandate directly, as if a flow had been completed earlier
    pub fn with_mandate(self, mandate_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .mandates
            .insert(mandate_id.to_string());
        self
    }

    pub fn flow_status(&self, redirect_flow_id: &str) -> Option<MockFlowStatus> {
        self.state
            .lock()
            .unwrap()
            .flows
            .get(redirect_flow_id)
            .map(|f| f.status)
    }

    /// Get all calls in order
    pub fn calls(&self) -> Vec<ProcessorCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Number of distinct payments created (idempotent replays not counted)
    pub fn payment_count(&self) -> usize {
        self.state.lock().unwrap().payments_by_key.len()
    }

    /// ServerDeps wired to this mock
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            Arc::new(self.clone()),
            RedirectSettings::new("https://gateway.test", "Direct Debit for GoCardTest"),
        )
    }
}

#[async_trait]
impl BasePaymentProcessor for MockPaymentProcessor {
    async fn create_redirect_flow(
        &self,
        request: RedirectFlowRequest,
    ) -> Result<HostedRedirectFlow, ProcessorError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProcessorCall::CreateRedirectFlow(request.clone()));
        if state.unreachable {
            return Err(ProcessorError::Unreachable("connection refused".into()));
        }

        let id = state.next_id("RE");
        state.flows.insert(
            id.clone(),
            MockFlow {
                session_token: request.session_token,
                customer_name: request.customer_name,
                status: MockFlowStatus::Pending,
            },
        );

        Ok(HostedRedirectFlow {
            redirect_url: format!("{}{}", MOCK_REDIRECT_BASE, id),
            id,
        })
    }

    async fn complete_redirect_flow(
        &self,
        redirect_flow_id: &str,
        session_token: &str,
    ) -> Result<CompletedRedirectFlow, ProcessorError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProcessorCall::CompleteRedirectFlow {
            redirect_flow_id: redirect_flow_id.to_string(),
            session_token: session_token.to_string(),
        });
        if state.unreachable {
            return Err(ProcessorError::Unreachable("connection refused".into()));
        }

        let flow = match state.flows.get(redirect_flow_id) {
            Some(flow) => flow.clone(),
            None => {
                return Err(rejection(
                    404,
                    "invalid_api_usage",
                    "resource_not_found",
                    "Resource not found",
                ))
            }
        };

        if flow.session_token != session_token {
            return Err(rejection(
                422,
                "invalid_api_usage",
                "session_token_mismatch",
                "The session token provided does not match the one used to create the redirect flow",
            ));
        }

        match flow.status {
            MockFlowStatus::Pending => {
                return Err(rejection(
                    400,
                    "invalid_state",
                    "redirect_flow_incomplete",
                    "The customer has not yet completed the payment pages",
                ))
            }
            MockFlowStatus::Completed => {
                return Err(rejection(
                    400,
                    "invalid_state",
                    "redirect_flow_already_completed",
                    "This redirect flow has already been completed",
                ))
            }
            MockFlowStatus::Submitted => {}
        }

        let mandate_id = state.next_id("MD");
        let customer_id = state.next_id("CU");
        state.mandates.insert(mandate_id.clone());
        if let Some(stored) = state.flows.get_mut(redirect_flow_id) {
            stored.status = MockFlowStatus::Completed;
        }
        tracing::debug!(customer = %flow.customer_name, %mandate_id, "Mock flow completed");

        Ok(CompletedRedirectFlow {
            id: redirect_flow_id.to_string(),
            mandate_id: Some(mandate_id),
            customer_id: Some(customer_id),
        })
    }

    async fn create_payment(
        &self,
        request: PaymentRequest,
        idempotency_key: &str,
    ) -> Result<serde_json::Value, ProcessorError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProcessorCall::CreatePayment {
            request: request.clone(),
            idempotency_key: idempotency_key.to_string(),
        });
        if state.unreachable {
            return Err(ProcessorError::Unreachable("connection refused".into()));
        }

        if let Some(existing) = state.payments_by_key.get(idempotency_key) {
            return Ok(existing.clone());
        }

        if !state.mandates.contains(&request.mandate_id) {
            return Err(rejection(
                404,
                "invalid_api_usage",
                "resource_not_found",
                "Mandate not found",
            ));
        }

        if !SUPPORTED_CURRENCIES.contains(&request.currency.as_str()) {
            return Err(rejection(
                422,
                "validation_failed",
                "invalid_currency",
                "currency is not supported",
            ));
        }

        let id = state.next_id("PM");
        let payment = serde_json::json!({
            "payments": {
                "id": id,
                "amount": request.amount,
                "currency": request.currency,
                "status": "pending_submission",
                "amount_refunded": 0,
                "charge_date": null,
                "reference": null,
                "metadata": {},
                "links": {
                    "mandate": request.mandate_id,
                    "creditor": "CR000001"
                }
            }
        });
        state
            .payments_by_key
            .insert(idempotency_key.to_string(), payment.clone());

        Ok(payment)
    }
}
