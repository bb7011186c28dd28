use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

use crate::credentials::CredentialPersistence;

const DEFAULT_GATEWAY_URL: &str = "http://localhost:3000";

/// App configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub firebase_api_key: String,
    pub firebase_project_id: String,
    /// Overrides every Firebase endpoint (emulator, mock server)
    pub firebase_base_url: Option<String>,
    pub gateway_url: String,
    pub credential_persistence: CredentialPersistence,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let store = env::var("APP_CREDENTIAL_STORE").unwrap_or_else(|_| "memory".to_string());
        let credential_persistence =
            parse_persistence(&store, env::var("APP_CREDENTIAL_PATH").ok())?;

        Ok(Self {
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .context("FIREBASE_API_KEY must be set")?,
            firebase_project_id: env::var("FIREBASE_PROJECT_ID")
                .context("FIREBASE_PROJECT_ID must be set")?,
            firebase_base_url: env::var("FIREBASE_BASE_URL").ok(),
            gateway_url: env::var("GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string()),
            credential_persistence,
        })
    }
}

fn parse_persistence(store: &str, path: Option<String>) -> Result<CredentialPersistence> {
    match store.trim().to_ascii_lowercase().as_str() {
        "memory" => Ok(CredentialPersistence::Memory),
        "file" => {
            let path = path
                .filter(|p| !p.trim().is_empty())
                .context("APP_CREDENTIAL_PATH must be set when APP_CREDENTIAL_STORE=file")?;
            Ok(CredentialPersistence::File(PathBuf::from(path)))
        }
        other => bail!("APP_CREDENTIAL_STORE must be 'memory' or 'file', got '{}'", other),
    }
}
