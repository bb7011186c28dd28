//! Direct debit endpoints.
//!
//! POST /api/start-redirect-flow     {name, email}
//! POST /api/confirm-redirect-flow   {redirect_flow_id, session_token}
//! GET  /api/confirm-redirect-flow   ?redirect_flow_id=..&session_token=..
//! POST /api/create-payment          {amount, currency, mandate_id, idempotency_nonce?}
//!
//! Failures answer with `{"error": message}`: 400 for bad input, 500 for
//! processor and network failures. Processor rejections also carry the
//! processor's own error body under `"processor"`.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use crate::domains::direct_debit::{
    self, ConfirmRedirectFlow, CreatePayment, DirectDebitError, Mandate, RedirectFlowStarted,
    StartRedirectFlow,
};
use crate::server::app::AxumAppState;
use crate::server::middleware::ClientIp;

impl IntoResponse for DirectDebitError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            DirectDebitError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            DirectDebitError::Processor { message, body, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": message, "processor": body }),
            ),
            DirectDebitError::Transport(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
        };

        (status, Json(body)).into_response()
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, DirectDebitError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| DirectDebitError::validation(rejection.body_text()))
}

fn client_ip(ip: &Option<Extension<ClientIp>>) -> String {
    ip.as_ref()
        .map(|Extension(ClientIp(ip))| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn start_redirect_flow_handler(
    Extension(state): Extension<AxumAppState>,
    ip: Option<Extension<ClientIp>>,
    payload: Result<Json<StartRedirectFlow>, JsonRejection>,
) -> Result<Json<RedirectFlowStarted>, DirectDebitError> {
    debug!(client_ip = %client_ip(&ip), "start-redirect-flow");
    let input = json_body(payload)?;

    direct_debit::start_redirect_flow(input, &state.deps)
        .await
        .map(Json)
}

pub async fn confirm_redirect_flow_handler(
    Extension(state): Extension<AxumAppState>,
    ip: Option<Extension<ClientIp>>,
    payload: Result<Json<ConfirmRedirectFlow>, JsonRejection>,
) -> Result<Json<Mandate>, DirectDebitError> {
    debug!(client_ip = %client_ip(&ip), "confirm-redirect-flow");
    let input = json_body(payload)?;

    direct_debit::confirm_redirect_flow(input, &state.deps)
        .await
        .map(Json)
}

/// Landing point of the processor's success redirect.
///
/// The processor only appends `redirect_flow_id`. The session token is never
/// part of the redirect, so the client app must append the `session_token` it
/// kept from the start call before following the URL; without it this answers
/// 400 and nothing is sent to the processor.
pub async fn confirm_redirect_flow_query_handler(
    Extension(state): Extension<AxumAppState>,
    ip: Option<Extension<ClientIp>>,
    query: Result<Query<ConfirmRedirectFlow>, QueryRejection>,
) -> Result<Json<Mandate>, DirectDebitError> {
    debug!(client_ip = %client_ip(&ip), "confirm-redirect-flow (redirect)");
    let Query(input) = query.map_err(|rejection| DirectDebitError::validation(rejection.body_text()))?;

    direct_debit::confirm_redirect_flow(input, &state.deps)
        .await
        .map(Json)
}

pub async fn create_payment_handler(
    Extension(state): Extension<AxumAppState>,
    ip: Option<Extension<ClientIp>>,
    payload: Result<Json<CreatePayment>, JsonRejection>,
) -> Result<Json<serde_json::Value>, DirectDebitError> {
    debug!(client_ip = %client_ip(&ip), "create-payment");
    let input = json_body(payload)?;

    direct_debit::create_payment(input, &state.deps)
        .await
        .map(Json)
}
