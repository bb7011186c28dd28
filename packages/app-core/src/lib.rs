//! Headless core of the GoCardTest mobile app.
//!
//! Account flows run against the identity provider and profile store;
//! direct debit setup and payments go through the gateway. Screens call
//! into [`AppCore`] and render whatever comes back.

pub mod accounts;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod profile;

pub use accounts::{AccountService, SignUpForm};
pub use config::AppConfig;
pub use credentials::{
    build_credential_store, CredentialPersistence, CredentialStore, FileCredentialStore,
    MemoryCredentialStore, StoredCredentials,
};
pub use error::{AppError, Result};
pub use gateway::{GatewayClient, Mandate, PaymentOrder, RedirectFlowStarted};
pub use identity::{FirebaseIdentity, IdentityProvider};
pub use profile::{FirestoreProfiles, ProfileStore, ProfileUpdate, UserProfile};

use firebase::{FirebaseClient, FirebaseOptions};
use std::sync::Arc;

/// Everything a screen needs, wired once at startup
pub struct AppCore {
    pub accounts: AccountService,
    pub gateway: GatewayClient,
}

impl AppCore {
    pub fn from_config(config: &AppConfig) -> Self {
        let mut options =
            FirebaseOptions::new(config.firebase_api_key.clone(), config.firebase_project_id.clone());
        if let Some(base_url) = &config.firebase_base_url {
            options = options.with_base_url(base_url);
        }
        let firebase = Arc::new(FirebaseClient::new(options));

        let accounts = AccountService::new(
            Arc::new(FirebaseIdentity::new(firebase.clone())),
            Arc::new(FirestoreProfiles::new(firebase)),
            build_credential_store(&config.credential_persistence),
        );

        Self {
            accounts,
            gateway: GatewayClient::new(config.gateway_url.clone()),
        }
    }
}
