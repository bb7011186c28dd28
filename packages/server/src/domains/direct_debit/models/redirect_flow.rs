use serde::{Deserialize, Serialize};

use super::SessionToken;
use crate::common::{is_plausible_email, is_processor_id};
use crate::domains::direct_debit::DirectDebitError;

/// Customer details used to prefill the hosted form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerIdentity {
    pub name: String,
    pub email: String,
}

/// One mandate setup attempt, opened when a redirect flow is started.
///
/// The token must come back unchanged on confirmation and is good for a
/// single successful confirmation.
#[derive(Debug, Clone)]
pub struct FlowSession {
    pub session_token: SessionToken,
    pub created_for: CustomerIdentity,
}

impl FlowSession {
    pub fn open(created_for: CustomerIdentity) -> Self {
        Self {
            session_token: SessionToken::generate(),
            created_for,
        }
    }
}

/// Input for starting a redirect flow.
///
/// Missing fields deserialize as empty so they are reported as validation
/// errors rather than body rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartRedirectFlow {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl StartRedirectFlow {
    pub fn validate(self) -> Result<CustomerIdentity, DirectDebitError> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() {
            return Err(DirectDebitError::validation("name is required"));
        }
        if email.is_empty() {
            return Err(DirectDebitError::validation("email is required"));
        }
        if !is_plausible_email(email) {
            return Err(DirectDebitError::validation(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        Ok(CustomerIdentity {
            name: name.to_string(),
            email: email.to_string(),
        })
    }
}

/// Everything the client needs to finish the round trip. `session_token` is
/// not retrievable later, so the client has to keep it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectFlowStarted {
    pub redirect_url: String,
    pub redirect_flow_id: String,
    pub session_token: String,
}

/// Input for confirming a redirect flow, from a JSON body or the redirect's query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmRedirectFlow {
    #[serde(default)]
    pub redirect_flow_id: String,
    #[serde(default)]
    pub session_token: String,
}

impl ConfirmRedirectFlow {
    pub fn validate(&self) -> Result<(), DirectDebitError> {
        let redirect_flow_id = self.redirect_flow_id.trim();
        if redirect_flow_id.is_empty() {
            return Err(DirectDebitError::validation("redirect_flow_id is required"));
        }
        if !is_processor_id(redirect_flow_id) {
            return Err(DirectDebitError::validation(
                "redirect_flow_id must contain only letters, digits and underscores",
            ));
        }
        if self.session_token.is_empty() {
            return Err(DirectDebitError::validation(
                "session_token is required (append the token returned by start-redirect-flow)",
            ));
        }
        Ok(())
    }
}
