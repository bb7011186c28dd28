//! Test harness for driving the gateway in-process.
//!
//! The router is built exactly as in production, but with the in-memory
//! payment processor instead of GoCardless and without rate limiting.

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use gateway_core::kernel::MockPaymentProcessor;
use gateway_core::server::{build_app, AppOptions};
use serde_json::Value;
use test_context::AsyncTestContext;
use tower::ServiceExt;

/// Test harness that owns one mock processor and the router wired to it.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let (status, body) = ctx.post_json("/api/start-redirect-flow", json!({...})).await;
/// }
/// ```
pub struct TestHarness {
    pub processor: MockPaymentProcessor,
    pub app: Router,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self::with_processor(MockPaymentProcessor::new())
    }

    async fn teardown(self) {}
}

impl TestHarness {
    pub fn with_processor(processor: MockPaymentProcessor) -> Self {
        let app = build_app(processor.server_deps(), AppOptions::default())
            .expect("Failed to build test app");
        Self { processor, app }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, body)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Start a flow for Jane Doe, returning (redirect_flow_id, session_token).
    pub async fn start_flow(&self) -> (String, String) {
        let (status, body) = self
            .post_json(
                "/api/start-redirect-flow",
                serde_json::json!({ "name": "Jane Doe", "email": "jane@example.com" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "start failed: {}", body);

        (
            body["redirect_flow_id"].as_str().unwrap().to_string(),
            body["session_token"].as_str().unwrap().to_string(),
        )
    }

    /// Start a flow, fill in the hosted form and confirm it. Returns the mandate id.
    pub async fn confirmed_mandate(&self) -> String {
        let (flow_id, token) = self.start_flow().await;
        assert!(self.processor.submit_hosted_form(&flow_id));

        let (status, body) = self
            .post_json(
                "/api/confirm-redirect-flow",
                serde_json::json!({ "redirect_flow_id": flow_id, "session_token": token }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "confirm failed: {}", body);

        body["mandate_id"].as_str().unwrap().to_string()
    }
}
