//! Account flows: sign up, sign in, profile and credential changes.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::credentials::{CredentialStore, StoredCredentials};
use crate::error::{AppError, Result};
use crate::identity::IdentityProvider;
use crate::profile::{ProfileStore, ProfileUpdate, UserProfile};

/// Everything the sign-up form collects
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_date_of_birth(value: &str) -> Result<()> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| AppError::validation("Date of birth must be YYYY-MM-DD."))
}

pub struct AccountService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    credentials: Arc<dyn CredentialStore>,
}

impl AccountService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            identity,
            profiles,
            credentials,
        }
    }

    /// Create the account, write its profile document and remember the session.
    pub async fn sign_up(&self, form: SignUpForm) -> Result<StoredCredentials> {
        if form.password != form.confirm_password {
            return Err(AppError::validation("Passwords must match."));
        }
        if is_blank(&form.first_name) || is_blank(&form.last_name) || is_blank(&form.date_of_birth)
        {
            return Err(AppError::validation("Fill out all fields."));
        }
        check_date_of_birth(&form.date_of_birth)?;

        let email = form.email.trim();
        let session = self.identity.sign_up(email, &form.password).await?;
        let credentials = StoredCredentials::from_session(&session, Utc::now());

        let profile = UserProfile {
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            date_of_birth: form.date_of_birth.trim().to_string(),
            email: session.email.clone().or_else(|| Some(email.to_string())),
            created_at: Some(Utc::now().timestamp_millis()),
        };
        self.profiles
            .create(&credentials.id_token, &credentials.uid, &profile)
            .await?;

        self.credentials.save(&credentials).await?;
        tracing::info!(uid = %credentials.uid, "Account created");
        Ok(credentials)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<StoredCredentials> {
        let session = self.identity.sign_in(email.trim(), password).await?;
        let credentials = StoredCredentials::from_session(&session, Utc::now());
        self.credentials.save(&credentials).await?;

        tracing::info!(uid = %credentials.uid, "Signed in");
        Ok(credentials)
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.credentials.clear().await?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// The remembered session, refreshed first if its id token has expired.
    pub async fn current_session(&self) -> Result<Option<StoredCredentials>> {
        let Some(stored) = self.credentials.load().await? else {
            return Ok(None);
        };

        let now = Utc::now();
        if !stored.is_expired(now) {
            return Ok(Some(stored));
        }

        tracing::debug!(uid = %stored.uid, "Refreshing expired id token");
        let session = self.identity.refresh(&stored.refresh_token).await?;
        let mut refreshed = StoredCredentials::from_session(&session, now);
        // The token endpoint does not return the email.
        if refreshed.email.is_none() {
            refreshed.email = stored.email;
        }

        self.credentials.save(&refreshed).await?;
        Ok(Some(refreshed))
    }

    async fn require_session(&self) -> Result<StoredCredentials> {
        self.current_session().await?.ok_or(AppError::NotSignedIn)
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::validation("Enter your email."));
        }

        self.identity.send_password_reset(email).await
    }

    pub async fn load_profile(&self) -> Result<Option<UserProfile>> {
        let session = self.require_session().await?;
        self.profiles.load(&session.id_token, &session.uid).await
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<()> {
        if is_blank(&update.first_name)
            || is_blank(&update.last_name)
            || is_blank(&update.date_of_birth)
        {
            return Err(AppError::validation("All fields required."));
        }
        check_date_of_birth(&update.date_of_birth)?;

        let session = self.require_session().await?;
        let update = ProfileUpdate {
            first_name: update.first_name.trim().to_string(),
            last_name: update.last_name.trim().to_string(),
            date_of_birth: update.date_of_birth.trim().to_string(),
        };
        self.profiles
            .update(&session.id_token, &session.uid, &update)
            .await?;

        tracing::info!(uid = %session.uid, "Profile updated");
        Ok(())
    }

    /// Change the sign-in email. The stored tokens belong to the old address,
    /// so the user is signed out and must log back in with the new one.
    pub async fn change_email(&self, new_email: &str, current_password: &str) -> Result<()> {
        let new_email = new_email.trim();
        if new_email.is_empty() || current_password.is_empty() {
            return Err(AppError::validation("Email + current password required."));
        }

        let fresh = self.reauthenticate(current_password).await?;
        self.identity
            .update_email(&fresh.id_token, new_email)
            .await?;

        tracing::info!(uid = %fresh.local_id, "Email changed");
        self.sign_out().await
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<()> {
        if new_password != confirm_password || current_password.is_empty() {
            return Err(AppError::validation(
                "Passwords must match + current password.",
            ));
        }

        let fresh = self.reauthenticate(current_password).await?;
        let issued = self
            .identity
            .update_password(&fresh.id_token, new_password)
            .await?;

        // Changing the password revokes older tokens; keep whichever session is newest.
        let session = issued.unwrap_or(fresh);
        let mut credentials = StoredCredentials::from_session(&session, Utc::now());
        if credentials.email.is_none() {
            credentials.email = self.credentials.load().await?.and_then(|c| c.email);
        }
        self.credentials.save(&credentials).await?;

        tracing::info!(uid = %credentials.uid, "Password changed");
        Ok(())
    }

    /// Prove the current password again before a sensitive change.
    async fn reauthenticate(&self, current_password: &str) -> Result<firebase::AuthSession> {
        let session = self.require_session().await?;
        let email = session.email.unwrap_or_default();
        self.identity.sign_in(&email, current_password).await
    }
}
