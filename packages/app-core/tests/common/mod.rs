//! Shared setup for app-core integration tests.
//!
//! A single wiremock server stands in for Firebase; the gateway gets its own.

use app_core::{
    AccountService, CredentialStore, FirebaseIdentity, FirestoreProfiles, MemoryCredentialStore,
    StoredCredentials,
};
use chrono::{Duration, Utc};
use firebase::{FirebaseClient, FirebaseOptions};
use serde_json::json;
use std::sync::Arc;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const PROJECT: &str = "gocardtest";
pub const UID: &str = "uid-jane";

pub fn user_doc_path(uid: &str) -> String {
    format!("/projects/{}/databases/(default)/documents/users/{}", PROJECT, uid)
}

pub struct AccountHarness {
    pub firebase: MockServer,
    pub credentials: Arc<dyn CredentialStore>,
    pub accounts: AccountService,
}

impl AccountHarness {
    pub async fn new() -> Self {
        Self::with_store(Arc::new(MemoryCredentialStore::default())).await
    }

    pub async fn with_store(credentials: Arc<dyn CredentialStore>) -> Self {
        let firebase = MockServer::start().await;
        let client = Arc::new(FirebaseClient::new(
            FirebaseOptions::new("test-api-key", PROJECT).with_base_url(&firebase.uri()),
        ));

        let accounts = AccountService::new(
            Arc::new(FirebaseIdentity::new(client.clone())),
            Arc::new(FirestoreProfiles::new(client)),
            credentials.clone(),
        );

        Self {
            firebase,
            credentials,
            accounts,
        }
    }

    /// Store a session directly, as if the user had signed in earlier.
    pub async fn signed_in(&self, id_token: &str, expires_in_secs: i64) -> StoredCredentials {
        let credentials = StoredCredentials {
            uid: UID.to_string(),
            email: Some("jane@example.com".to_string()),
            id_token: id_token.to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        };
        self.credentials.save(&credentials).await.unwrap();
        credentials
    }

    /// Identity Toolkit answers `action` with a session for Jane.
    pub async fn mock_password_auth(&self, action: &str, id_token: &str, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/accounts:{}", action)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": UID,
                "email": "jane@example.com",
                "idToken": id_token,
                "refreshToken": "refresh-1",
                "expiresIn": "3600"
            })))
            .expect(expected_calls)
            .mount(&self.firebase)
            .await;
    }

    pub async fn mock_auth_error(&self, action: &str, code: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/accounts:{}", action)))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": code }
            })))
            .mount(&self.firebase)
            .await;
    }

    /// Fail the test if any request reaches Firebase.
    pub async fn expect_no_remote_calls(&self) {
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.firebase)
            .await;
    }
}
