//! Pure GoCardless Pro REST API client.
//!
//! Covers the direct debit mandate setup round trip (redirect flows) and
//! one-off payments against a confirmed mandate.
//!
//! # Example
//!
//! ```rust,ignore
//! use gocardless::{Environment, GoCardlessClient, GoCardlessOptions};
//!
//! let client = GoCardlessClient::new(GoCardlessOptions::new(token, Environment::Sandbox))?;
//! let flow = client.complete_redirect_flow("RE123", "session-token").await?;
//! println!("mandate: {:?}", flow.links.mandate);
//! ```

use std::fmt;
use std::str::FromStr;

pub mod error;
pub mod models;

pub use error::{GoCardlessError, Result};
pub use models::{
    CreatePaymentRequest, CreateRedirectFlowRequest, PaymentLinks, PrefilledCustomer,
    RedirectFlow, RedirectFlowLinks,
};

use models::{ActionEnvelope, CompleteRedirectFlowData, PaymentsEnvelope, RedirectFlowsEnvelope};
use reqwest::{header, Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

const SANDBOX_URL: &str = "https://api-sandbox.gocardless.com";
const LIVE_URL: &str = "https://api.gocardless.com";

/// Pinned API version sent with every request.
pub const API_VERSION: &str = "2015-07-06";

/// Processor ids (`RE...`, `MD...`) are letters, digits and underscores only.
pub fn is_resource_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Live,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_URL,
            Environment::Live => LIVE_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = GoCardlessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "live" => Ok(Environment::Live),
            other => Err(GoCardlessError::Config(format!(
                "unknown GoCardless environment '{}', expected 'sandbox' or 'live'",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Sandbox => write!(f, "sandbox"),
            Environment::Live => write!(f, "live"),
        }
    }
}

#[derive(Clone)]
pub struct GoCardlessOptions {
    pub access_token: String,
    pub environment: Environment,
    /// Overrides the environment's base URL (used against local mock servers).
    pub base_url: Option<String>,
}

impl GoCardlessOptions {
    pub fn new(access_token: impl Into<String>, environment: Environment) -> Self {
        Self {
            access_token: access_token.into(),
            environment,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

// Never print the access token.
impl fmt::Debug for GoCardlessOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoCardlessOptions")
            .field("access_token", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GoCardlessClient {
    client: Client,
    options: GoCardlessOptions,
    base_url: String,
}

impl GoCardlessClient {
    pub fn new(options: GoCardlessOptions) -> Result<Self> {
        if options.access_token.trim().is_empty() {
            return Err(GoCardlessError::Config(
                "access token must not be empty".to_string(),
            ));
        }

        let base_url = options
            .base_url
            .clone()
            .unwrap_or_else(|| options.environment.base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = Url::parse(&base_url)
            .map_err(|e| GoCardlessError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(GoCardlessError::Config(format!(
                "base URL '{}' cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            client: Client::new(),
            options,
            base_url,
        })
    }

    pub fn environment(&self) -> Environment {
        self.options.environment
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL plus one percent-encoded path segment per item.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GoCardlessError::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GoCardlessError::Config("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.client
            .post(url)
            .bearer_auth(&self.options.access_token)
            .header("GoCardless-Version", API_VERSION)
            .header(header::ACCEPT, "application/json")
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "GoCardless returned an error");
            return Err(GoCardlessError::from_response(status.as_u16(), &body));
        }

        resp.json::<T>()
            .await
            .map_err(|e| GoCardlessError::Decode(e.to_string()))
    }

    /// Create a hosted redirect flow. The customer must be sent to
    /// `redirect_url` to fill in their bank details.
    pub async fn create_redirect_flow(
        &self,
        params: &CreateRedirectFlowRequest,
    ) -> Result<RedirectFlow> {
        let body = RedirectFlowsEnvelope {
            redirect_flows: params,
        };

        let envelope: RedirectFlowsEnvelope<RedirectFlow> =
            self.send(self.post(self.endpoint(&["redirect_flows"])?).json(&body)).await?;

        tracing::debug!(redirect_flow_id = %envelope.redirect_flows.id, "Redirect flow created");
        Ok(envelope.redirect_flows)
    }

    /// Complete a redirect flow after the customer returns from the hosted page.
    ///
    /// The processor checks that `session_token` matches the token the flow was
    /// created with and that the flow has not already been completed.
    pub async fn complete_redirect_flow(
        &self,
        redirect_flow_id: &str,
        session_token: &str,
    ) -> Result<RedirectFlow> {
        let body = ActionEnvelope {
            data: CompleteRedirectFlowData { session_token },
        };
        if !is_resource_id(redirect_flow_id) {
            return Err(GoCardlessError::InvalidResourceId(redirect_flow_id.to_string()));
        }
        let url = self.endpoint(&["redirect_flows", redirect_flow_id, "actions", "complete"])?;

        let envelope: RedirectFlowsEnvelope<RedirectFlow> =
            self.send(self.post(url).json(&body)).await?;
        Ok(envelope.redirect_flows)
    }

    /// Create a one-off payment against a mandate.
    ///
    /// Returns the full response body unmodified. When `idempotency_key` is
    /// given, the processor returns the original payment for repeated keys
    /// instead of creating a second charge.
    pub async fn create_payment(
        &self,
        params: &CreatePaymentRequest,
        idempotency_key: Option<&str>,
    ) -> Result<serde_json::Value> {
        let body = PaymentsEnvelope { payments: params };

        let mut request = self.post(self.endpoint(&["payments"])?).json(&body);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        self.send(request).await
    }
}
