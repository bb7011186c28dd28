//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::{extract_client_ip, with_rate_limit, RateLimitSettings};
use crate::server::routes::{
    confirm_redirect_flow_handler, confirm_redirect_flow_query_handler, create_payment_handler,
    health_handler, start_redirect_flow_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
}

/// Options for building the router
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Empty allows any origin
    pub allowed_origins: Vec<String>,
    /// None disables rate limiting (in-process tests have no peer address)
    pub rate_limit: Option<RateLimitSettings>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
}

/// Build the Axum application router
///
/// The processor client lives inside `deps`, constructed by the caller at startup.
pub fn build_app(deps: ServerDeps, options: AppOptions) -> Result<Router> {
    let app_state = AxumAppState {
        deps: Arc::new(deps),
    };

    let mut api = Router::new()
        .route("/start-redirect-flow", post(start_redirect_flow_handler))
        .route(
            "/confirm-redirect-flow",
            post(confirm_redirect_flow_handler).get(confirm_redirect_flow_query_handler),
        )
        .route("/create-payment", post(create_payment_handler));

    if let Some(settings) = options.rate_limit {
        api = with_rate_limit(api, settings)?;
    }

    let app = Router::new()
        .nest("/api", api)
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(extract_client_ip))
        .layer(Extension(app_state))
        .layer(cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
