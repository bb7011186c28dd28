// Rate limiting middleware using tower-governor
//
// Per-IP token bucket on the /api routes. Every request there reaches the
// payment processor, so abuse costs real API quota.
//
// Applied in app.rs as a layer on the /api router

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub per_second: u64,
    pub burst_size: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            per_second: 10,
            burst_size: 20,
        }
    }
}

/// Wrap a router in the governor layer.
/// Buckets are keyed on the peer address; responses carry x-ratelimit headers.
pub fn with_rate_limit(router: Router, settings: RateLimitSettings) -> Result<Router> {
    let config = GovernorConfigBuilder::default()
        .per_second(settings.per_second)
        .burst_size(settings.burst_size)
        .use_headers()
        .finish()
        .context("Rate limiter configuration is invalid (per_second and burst must be > 0)")?;

    Ok(router.layer(GovernorLayer {
        config: Arc::new(config),
    }))
}
