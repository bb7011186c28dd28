//! GoCardless client tests against a local mock server.

use gocardless::{
    CreatePaymentRequest, CreateRedirectFlowRequest, Environment, GoCardlessClient,
    GoCardlessError, GoCardlessOptions, PaymentLinks, PrefilledCustomer,
};
use wiremock::{
    matchers::{body_json, header, header_exists, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> GoCardlessClient {
    let options =
        GoCardlessOptions::new("test_access_token", Environment::Sandbox).with_base_url(server.uri());
    GoCardlessClient::new(options).unwrap()
}

#[tokio::test]
async fn test_create_redirect_flow_sends_envelope_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/redirect_flows"))
        .and(header("Authorization", "Bearer test_access_token"))
        .and(header("GoCardless-Version", "2015-07-06"))
        .and(body_json(serde_json::json!({
            "redirect_flows": {
                "description": "Direct Debit for GoCardTest",
                "session_token": "tok_1",
                "success_redirect_url": "https://gateway.test/api/confirm-redirect-flow",
                "prefilled_customer": {
                    "given_name": "Jane Doe",
                    "email": "jane@example.com"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "redirect_flows": {
                "id": "RE123",
                "description": "Direct Debit for GoCardTest",
                "session_token": "tok_1",
                "redirect_url": "https://pay-sandbox.gocardless.com/flow/RE123",
                "created_at": "2024-01-01T00:00:00.000Z",
                "links": { "creditor": "CR123" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let flow = client_for(&server)
        .create_redirect_flow(&CreateRedirectFlowRequest {
            description: "Direct Debit for GoCardTest".to_string(),
            session_token: "tok_1".to_string(),
            success_redirect_url: "https://gateway.test/api/confirm-redirect-flow".to_string(),
            prefilled_customer: PrefilledCustomer {
                given_name: Some("Jane Doe".to_string()),
                email: Some("jane@example.com".to_string()),
                ..Default::default()
            },
        })
        .await
        .unwrap();

    assert_eq!(flow.id, "RE123");
    assert_eq!(
        flow.redirect_url.as_deref(),
        Some("https://pay-sandbox.gocardless.com/flow/RE123")
    );
    assert_eq!(flow.links.creditor.as_deref(), Some("CR123"));
    assert!(flow.links.mandate.is_none());
}

#[tokio::test]
async fn test_complete_redirect_flow_returns_links() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/redirect_flows/RE123/actions/complete"))
        .and(body_json(serde_json::json!({ "data": { "session_token": "tok_1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "redirect_flows": {
                "id": "RE123",
                "links": {
                    "creditor": "CR123",
                    "mandate": "MD123",
                    "customer": "CU123",
                    "customer_bank_account": "BA123"
                }
            }
        })))
        .mount(&server)
        .await;

    let flow = client_for(&server)
        .complete_redirect_flow("RE123", "tok_1")
        .await
        .unwrap();

    assert_eq!(flow.links.mandate.as_deref(), Some("MD123"));
    assert_eq!(flow.links.customer.as_deref(), Some("CU123"));
}

#[tokio::test]
async fn test_complete_redirect_flow_surfaces_processor_error_body() {
    let server = MockServer::start().await;

    let error_body = serde_json::json!({
        "error": {
            "message": "The session token provided does not match the one used to create the flow",
            "type": "invalid_api_usage",
            "code": 422,
            "errors": [{ "reason": "session_token_mismatch" }]
        }
    });

    Mock::given(method("POST"))
        .and(path("/redirect_flows/RE123/actions/complete"))
        .respond_with(ResponseTemplate::new(422).set_body_json(error_body.clone()))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete_redirect_flow("RE123", "wrong")
        .await
        .unwrap_err();

    match err {
        GoCardlessError::Api { status, message, body } => {
            assert_eq!(status, 422);
            assert!(message.contains("session token"));
            assert_eq!(body, error_body);
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_payment_passes_idempotency_key_and_returns_raw_body() {
    let server = MockServer::start().await;

    let payment = serde_json::json!({
        "payments": {
            "id": "PM123",
            "amount": 1000,
            "currency": "GBP",
            "status": "pending_submission",
            "links": { "mandate": "MD123" }
        }
    });

    Mock::given(method("POST"))
        .and(path("/payments"))
        .and(header("Idempotency-Key", "key-abc"))
        .and(body_json(serde_json::json!({
            "payments": {
                "amount": 1000,
                "currency": "GBP",
                "links": { "mandate": "MD123" }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(payment.clone()))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .create_payment(
            &CreatePaymentRequest {
                amount: 1000,
                currency: "GBP".to_string(),
                links: PaymentLinks {
                    mandate: "MD123".to_string(),
                },
            },
            Some("key-abc"),
        )
        .await
        .unwrap();

    assert_eq!(result, payment);
}

#[tokio::test]
async fn test_create_payment_without_key_omits_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/payments"))
        .and(header_exists("Idempotency-Key"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/payments"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({ "payments": { "id": "PM1" } })),
        )
        .mount(&server)
        .await;

    let result = client_for(&server)
        .create_payment(
            &CreatePaymentRequest {
                amount: 500,
                currency: "EUR".to_string(),
                links: PaymentLinks {
                    mandate: "MD1".to_string(),
                },
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(result["payments"]["id"], "PM1");
}

#[tokio::test]
async fn test_complete_rejects_flow_id_that_escapes_its_path() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for flow_id in ["../../mandates/MD123/actions/cancel?", "../x", "RE1#x", "RE1/.."] {
        let result = client.complete_redirect_flow(flow_id, "tok").await;
        assert!(
            matches!(result, Err(GoCardlessError::InvalidResourceId(ref id)) if id == flow_id),
            "flow id {:?} was not rejected",
            flow_id
        );
    }

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
