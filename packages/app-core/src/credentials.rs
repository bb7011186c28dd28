//! Credential persistence.
//!
//! Whether a sign-in survives a restart is decided once, at startup, by
//! choosing a [`CredentialPersistence`]. Everything else talks to an
//! `Arc<dyn CredentialStore>` and never asks which kind it got.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use firebase::AuthSession;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::error::{AppError, Result};

/// Tokens are treated as expired this long before the provider says so.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Upper bound on the lifetime taken from the provider's `expiresIn`.
const MAX_TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub uid: String,
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredCredentials {
    pub fn from_session(session: &AuthSession, now: DateTime<Utc>) -> Self {
        Self {
            uid: session.local_id.clone(),
            email: session.email.clone(),
            id_token: session.id_token.clone(),
            refresh_token: session.refresh_token.clone(),
            expires_at: now
                + Duration::seconds(session.expires_in.min(MAX_TOKEN_LIFETIME_SECS) as i64),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_SKEW_SECS) >= self.expires_at
    }
}

impl std::fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<Option<StoredCredentials>>;
    async fn save(&self, credentials: &StoredCredentials) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}

/// How credentials are kept between runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialPersistence {
    /// Lost when the process exits
    Memory,
    /// JSON file at the given path
    File(PathBuf),
}

pub fn build_credential_store(persistence: &CredentialPersistence) -> Arc<dyn CredentialStore> {
    match persistence {
        CredentialPersistence::Memory => Arc::new(MemoryCredentialStore::default()),
        CredentialPersistence::File(path) => Arc::new(FileCredentialStore::new(path.clone())),
    }
}

// =============================================================================
// Memory
// =============================================================================

#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Option<StoredCredentials>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<StoredCredentials>> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        *self.inner.write().await = Some(credentials.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.inner.write().await = None;
        Ok(())
    }
}

// =============================================================================
// File
// =============================================================================

pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<Option<StoredCredentials>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(credentials) => Ok(Some(credentials)),
            Err(e) => {
                // A damaged file means signing in again, not a crash.
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable credentials file");
                Ok(None)
            }
        }
    }

    async fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(credentials)
            .map_err(|e| AppError::Storage(e.to_string()))?;

        // Write then rename so a crash never leaves a half-written file.
        // Owner-only from creation: the file holds a long-lived refresh token.
        let temp = self.temp_path();
        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&temp).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        drop(file);

        // A stale temp file from an older run keeps its old mode through open().
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&temp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&temp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), uid = %credentials.uid, "Credentials saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in: u64) -> AuthSession {
        AuthSession {
            local_id: "uid-1".into(),
            email: Some("jane@example.com".into()),
            id_token: "id-token".into(),
            refresh_token: "refresh-token".into(),
            expires_in,
        }
    }

    #[test]
    fn test_expiry_includes_skew() {
        let now = Utc::now();
        let creds = StoredCredentials::from_session(&session(3600), now);

        assert!(!creds.is_expired(now));
        assert!(!creds.is_expired(now + Duration::seconds(3500)));
        assert!(creds.is_expired(now + Duration::seconds(3540)));
    }

    #[test]
    fn test_absurd_lifetime_is_clamped() {
        let now = Utc::now();
        let creds = StoredCredentials::from_session(&session(u64::MAX), now);

        assert_eq!(
            creds.expires_at,
            now + Duration::seconds(MAX_TOKEN_LIFETIME_SECS as i64)
        );
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let creds = StoredCredentials::from_session(&session(3600), Utc::now());
        let printed = format!("{:?}", creds);

        assert!(!printed.contains("id-token"));
        assert!(!printed.contains("refresh-token"));
        assert!(printed.contains("uid-1"));
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip_and_clear() {
        let store = build_credential_store(&CredentialPersistence::Memory);
        assert!(store.load().await.unwrap().is_none());

        let creds = StoredCredentials::from_session(&session(3600), Utc::now());
        store.save(&creds).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(creds));

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let store = FileCredentialStore::new("/var/app/credentials.json");
        assert_eq!(
            store.temp_path(),
            PathBuf::from("/var/app/credentials.json.tmp")
        );
    }
}
