// Main entry point for the direct debit gateway

use std::sync::Arc;

use anyhow::{Context, Result};
use gateway_core::{
    kernel::{GoCardlessAdapter, RedirectSettings, ServerDeps},
    server::{build_app, middleware::RateLimitSettings, AppOptions},
    Config,
};
use gocardless::{GoCardlessClient, GoCardlessOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gateway_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Direct Debit Gateway");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        environment = %config.gocardless_environment,
        base_url = %config.base_url,
        "Configuration loaded"
    );

    // Processor client, owned by this process for its whole lifetime
    let mut options =
        GoCardlessOptions::new(config.gocardless_access_token.clone(), config.gocardless_environment);
    if let Some(api_url) = &config.gocardless_api_url {
        options = options.with_base_url(api_url.clone());
    }
    let client = GoCardlessClient::new(options).context("Failed to create GoCardless client")?;
    tracing::info!(api = %client.base_url(), "GoCardless client initialized");

    let deps = ServerDeps::new(
        Arc::new(GoCardlessAdapter::new(Arc::new(client))),
        RedirectSettings::new(&config.base_url, config.redirect_flow_description.clone()),
    );

    // Build application
    let app = build_app(
        deps,
        AppOptions {
            allowed_origins: config.allowed_origins.clone(),
            rate_limit: Some(RateLimitSettings {
                per_second: config.rate_limit_per_second,
                burst_size: config.rate_limit_burst,
            }),
        },
    )
    .context("Failed to build application")?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
