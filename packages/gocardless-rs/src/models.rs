use serde::{Deserialize, Serialize};

/// Customer details shown pre-filled on the hosted payment page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PrefilledCustomer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Body of `POST /redirect_flows`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRedirectFlowRequest {
    pub description: String,
    pub session_token: String,
    pub success_redirect_url: String,
    pub prefilled_customer: PrefilledCustomer,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RedirectFlowLinks {
    pub creditor: Option<String>,
    pub mandate: Option<String>,
    pub customer: Option<String>,
    pub customer_bank_account: Option<String>,
}

/// A redirect flow as returned by the processor. Only `mandate` and `customer`
/// links are populated once the flow has been completed.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectFlow {
    pub id: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default)]
    pub success_redirect_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub links: RedirectFlowLinks,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentLinks {
    pub mandate: String,
}

/// Body of `POST /payments`. `amount` is in minor currency units.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentRequest {
    pub amount: u64,
    pub currency: String,
    pub links: PaymentLinks,
}

/// `{"redirect_flows": {...}}` request/response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RedirectFlowsEnvelope<T> {
    pub redirect_flows: T,
}

/// `{"payments": {...}}` request envelope.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PaymentsEnvelope<T> {
    pub payments: T,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CompleteRedirectFlowData<'a> {
    pub session_token: &'a str,
}

/// `{"data": {...}}` envelope used by action endpoints.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ActionEnvelope<T> {
    pub data: T,
}
