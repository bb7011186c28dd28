//! Confirm redirect flow action

use tracing::{error, info};

use crate::domains::direct_debit::models::{ConfirmRedirectFlow, Mandate};
use crate::domains::direct_debit::DirectDebitError;
use crate::kernel::ServerDeps;

/// Exchange a completed flow and its session token for a mandate.
///
/// Token matching and flow state are checked by the processor. A failed
/// attempt changes nothing and may be repeated; a flow that was already
/// confirmed fails instead of returning the mandate again.
pub async fn confirm_redirect_flow(
    input: ConfirmRedirectFlow,
    deps: &ServerDeps,
) -> Result<Mandate, DirectDebitError> {
    input.validate()?;
    let redirect_flow_id = input.redirect_flow_id.trim();

    let flow = deps
        .processor
        .complete_redirect_flow(redirect_flow_id, &input.session_token)
        .await
        .map_err(|e| {
            error!(redirect_flow_id, error = %e, "Failed to confirm redirect flow");
            DirectDebitError::from(e)
        })?;

    let (mandate_id, customer_id) = match (flow.mandate_id, flow.customer_id) {
        (Some(mandate_id), Some(customer_id)) => (mandate_id, customer_id),
        _ => {
            error!(redirect_flow_id, "Completed redirect flow is missing mandate/customer links");
            return Err(DirectDebitError::Transport(format!(
                "redirect flow {} completed without mandate and customer links",
                redirect_flow_id
            )));
        }
    };

    info!(redirect_flow_id, %mandate_id, %customer_id, "Redirect flow confirmed");

    Ok(Mandate {
        mandate_id,
        customer_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::direct_debit::{start_redirect_flow, StartRedirectFlow};
    use crate::kernel::{MockFlowStatus, MockPaymentProcessor};

    async fn started_flow(processor: &MockPaymentProcessor) -> (String, String) {
        let started = start_redirect_flow(
            StartRedirectFlow {
                name: "Jane Doe".into(),
                email: "jane@example.com".into(),
            },
            &processor.server_deps(),
        )
        .await
        .unwrap();
        (started.redirect_flow_id, started.session_token)
    }

    #[tokio::test]
    async fn test_wrong_token_fails_and_flow_stays_confirmable() {
        let processor = MockPaymentProcessor::new();
        let deps = processor.server_deps();
        let (flow_id, token) = started_flow(&processor).await;
        processor.submit_hosted_form(&flow_id);

        let wrong = confirm_redirect_flow(
            ConfirmRedirectFlow {
                redirect_flow_id: flow_id.clone(),
                session_token: "not-the-token".into(),
            },
            &deps,
        )
        .await;
        assert!(matches!(wrong, Err(DirectDebitError::Processor { status: 422, .. })));
        assert_eq!(processor.flow_status(&flow_id), Some(MockFlowStatus::Submitted));

        let mandate = confirm_redirect_flow(
            ConfirmRedirectFlow {
                redirect_flow_id: flow_id,
                session_token: token,
            },
            &deps,
        )
        .await
        .unwrap();
        assert!(!mandate.mandate_id.is_empty());
        assert!(!mandate.customer_id.is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_is_validation_error() {
        let processor = MockPaymentProcessor::new();

        let result = confirm_redirect_flow(
            ConfirmRedirectFlow {
                redirect_flow_id: "RE000001".into(),
                session_token: "".into(),
            },
            &processor.server_deps(),
        )
        .await;

        assert!(matches!(result, Err(DirectDebitError::Validation(_))));
        assert_eq!(processor.call_count(), 0);
    }
}
