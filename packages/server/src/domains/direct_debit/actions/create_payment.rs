//! Create payment action

use tracing::{error, info};

use crate::domains::direct_debit::models::CreatePayment;
use crate::domains::direct_debit::DirectDebitError;
use crate::kernel::{PaymentRequest, ServerDeps};

/// Charge a confirmed mandate. Returns the processor's payment object as-is.
pub async fn create_payment(
    input: CreatePayment,
    deps: &ServerDeps,
) -> Result<serde_json::Value, DirectDebitError> {
    let intent = input.validate()?;
    let idempotency_key = intent.idempotency_key();

    let request = PaymentRequest {
        amount: intent.amount,
        currency: intent.currency.clone(),
        mandate_id: intent.mandate_id.clone(),
    };

    let payment = deps
        .processor
        .create_payment(request, &idempotency_key)
        .await
        .map_err(|e| {
            error!(mandate_id = %intent.mandate_id, error = %e, "Failed to create payment");
            DirectDebitError::from(e)
        })?;

    info!(
        mandate_id = %intent.mandate_id,
        amount = intent.amount,
        currency = %intent.currency,
        "Payment created"
    );

    Ok(payment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{MockPaymentProcessor, ProcessorCall};

    #[tokio::test]
    async fn test_retry_with_same_nonce_charges_once() {
        let processor = MockPaymentProcessor::new().with_mandate("MD000042");
        let deps = processor.server_deps();
        let input = CreatePayment {
            amount: 1000,
            currency: "GBP".into(),
            mandate_id: "MD000042".into(),
            idempotency_nonce: Some("order-1".into()),
        };

        let first = create_payment(input.clone(), &deps).await.unwrap();
        let second = create_payment(input, &deps).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(processor.payment_count(), 1);
    }

    #[tokio::test]
    async fn test_key_is_sent_with_request() {
        let processor = MockPaymentProcessor::new().with_mandate("MD000042");
        let deps = processor.server_deps();

        create_payment(
            CreatePayment {
                amount: 250,
                currency: "eur".into(),
                mandate_id: "MD000042".into(),
                idempotency_nonce: Some("n".into()),
            },
            &deps,
        )
        .await
        .unwrap();

        match &processor.calls()[..] {
            [ProcessorCall::CreatePayment {
                request,
                idempotency_key,
            }] => {
                assert_eq!(request.currency, "EUR");
                assert_eq!(
                    idempotency_key,
                    &crate::common::generate_idempotency_key("MD000042", 250, "EUR", "n")
                );
            }
            other => panic!("unexpected calls: {:?}", other),
        }
    }
}
