use anyhow::{Context, Result};
use dotenvy::dotenv;
use gocardless::Environment;
use std::env;

const DEFAULT_DESCRIPTION: &str = "Direct Debit for GoCardTest";

/// Application configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub gocardless_access_token: String,
    pub gocardless_environment: Environment,
    /// Overrides the environment's API URL (mock servers, proxies)
    pub gocardless_api_url: Option<String>,
    /// Public URL of this gateway; the processor redirects customers back here
    pub base_url: String,
    pub redirect_flow_description: String,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let gocardless_environment = env::var("GOCARDLESS_ENVIRONMENT")
            .context("GOCARDLESS_ENVIRONMENT must be set")?
            .parse::<Environment>()
            .context("GOCARDLESS_ENVIRONMENT must be 'sandbox' or 'live'")?;

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            gocardless_access_token: env::var("GOCARDLESS_ACCESS_TOKEN")
                .context("GOCARDLESS_ACCESS_TOKEN must be set")?,
            gocardless_environment,
            gocardless_api_url: env::var("GOCARDLESS_API_URL").ok(),
            base_url: env::var("BASE_URL").context("BASE_URL must be set")?,
            redirect_flow_description: env::var("REDIRECT_FLOW_DESCRIPTION")
                .unwrap_or_else(|_| DEFAULT_DESCRIPTION.to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or_default(),
            rate_limit_per_second: env::var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("RATE_LIMIT_PER_SECOND must be a valid number")?,
            rate_limit_burst: env::var("RATE_LIMIT_BURST")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("RATE_LIMIT_BURST must be a valid number")?,
        })
    }
}

// Keeps the access token out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("gocardless_access_token", &"[REDACTED]")
            .field("gocardless_environment", &self.gocardless_environment)
            .field("gocardless_api_url", &self.gocardless_api_url)
            .field("base_url", &self.base_url)
            .field("redirect_flow_description", &self.redirect_flow_description)
            .field("allowed_origins", &self.allowed_origins)
            .field("rate_limit_per_second", &self.rate_limit_per_second)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .finish()
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
