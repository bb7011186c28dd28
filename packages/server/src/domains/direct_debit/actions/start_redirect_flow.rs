//! Start redirect flow action

use tracing::{error, info};

use crate::domains::direct_debit::models::{FlowSession, RedirectFlowStarted, StartRedirectFlow};
use crate::domains::direct_debit::DirectDebitError;
use crate::kernel::{RedirectFlowRequest, ServerDeps};

/// Ask the processor for a hosted mandate setup page.
///
/// Validation happens before any remote call. One attempt only: a failure is
/// returned to the caller, who may start over.
pub async fn start_redirect_flow(
    input: StartRedirectFlow,
    deps: &ServerDeps,
) -> Result<RedirectFlowStarted, DirectDebitError> {
    let customer = input.validate()?;
    let session = FlowSession::open(customer);

    let request = RedirectFlowRequest {
        description: deps.redirect.description.clone(),
        session_token: session.session_token.as_str().to_string(),
        success_redirect_url: deps.redirect.success_redirect_url.clone(),
        customer_name: session.created_for.name.clone(),
        customer_email: session.created_for.email.clone(),
    };

    let flow = deps
        .processor
        .create_redirect_flow(request)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create redirect flow");
            DirectDebitError::from(e)
        })?;

    info!(redirect_flow_id = %flow.id, "Redirect flow started");

    Ok(RedirectFlowStarted {
        redirect_url: flow.redirect_url,
        redirect_flow_id: flow.id,
        session_token: session.session_token.into_inner(),
    })
}
