//! Identity provider seam.

use async_trait::async_trait;
use firebase::{AuthSession, FirebaseClient};
use std::sync::Arc;

use crate::error::{AppError, Result};

/// Email/password accounts
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession>;

    async fn send_password_reset(&self, email: &str) -> Result<()>;

    /// Returns a fresh session when the provider issues one with the change.
    async fn update_email(&self, id_token: &str, new_email: &str) -> Result<Option<AuthSession>>;

    /// Returns a fresh session when the provider issues one with the change.
    async fn update_password(
        &self,
        id_token: &str,
        new_password: &str,
    ) -> Result<Option<AuthSession>>;

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession>;
}

/// Identity Toolkit backed accounts
pub struct FirebaseIdentity(pub Arc<FirebaseClient>);

impl FirebaseIdentity {
    pub fn new(client: Arc<FirebaseClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.0
            .sign_up(email, password)
            .await
            .map_err(AppError::Identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.0
            .sign_in_with_password(email, password)
            .await
            .map_err(AppError::Identity)
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        self.0
            .send_password_reset_email(email)
            .await
            .map_err(AppError::Identity)
    }

    async fn update_email(&self, id_token: &str, new_email: &str) -> Result<Option<AuthSession>> {
        let update = self
            .0
            .update_account(id_token, Some(new_email), None)
            .await
            .map_err(AppError::Identity)?;
        Ok(update.session)
    }

    async fn update_password(
        &self,
        id_token: &str,
        new_password: &str,
    ) -> Result<Option<AuthSession>> {
        let update = self
            .0
            .update_account(id_token, None, Some(new_password))
            .await
            .map_err(AppError::Identity)?;
        Ok(update.session)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession> {
        self.0
            .refresh_id_token(refresh_token)
            .await
            .map_err(AppError::Identity)
    }
}
