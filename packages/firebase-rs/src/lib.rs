//! Pure Firebase REST client.
//!
//! Email/password accounts through the Identity Toolkit API and document
//! reads/writes through the Firestore REST API. Document calls are made
//! with the signed-in user's id token so security rules apply.
//!
//! # Example
//!
//! ```rust,ignore
//! use firebase::{FirebaseClient, FirebaseOptions};
//!
//! let client = FirebaseClient::new(FirebaseOptions::new(api_key, "my-project"));
//! let session = client.sign_in_with_password("jane@example.com", "hunter22").await?;
//! let profile = client.get_document(&session.id_token, "users", &session.local_id).await?;
//! ```

pub mod error;
pub mod models;

pub use error::{FirebaseError, Result};
pub use models::{AccountUpdate, ArrayValue, AuthSession, Document, Fields, MapValue, Value};

use models::{PasswordAuthResponse, RefreshTokenResponse, UpdateAccountResponse};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

const AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com/v1";
const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

#[derive(Debug, Clone)]
pub struct FirebaseOptions {
    pub api_key: String,
    pub project_id: String,
    pub auth_base_url: String,
    pub token_base_url: String,
    pub firestore_base_url: String,
}

impl FirebaseOptions {
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            auth_base_url: AUTH_BASE_URL.to_string(),
            token_base_url: TOKEN_BASE_URL.to_string(),
            firestore_base_url: FIRESTORE_BASE_URL.to_string(),
        }
    }

    /// Point every endpoint at one base URL (local emulator or mock server).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.auth_base_url = base.to_string();
        self.token_base_url = base.to_string();
        self.firestore_base_url = base.to_string();
        self
    }
}

#[derive(Debug, Clone)]
pub struct FirebaseClient {
    client: Client,
    options: FirebaseOptions,
}

impl FirebaseClient {
    pub fn new(options: FirebaseOptions) -> Self {
        Self {
            client: Client::new(),
            options,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.options.project_id
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FirebaseError::from_response(status.as_u16(), &body));
        }

        resp.json::<T>()
            .await
            .map_err(|e| FirebaseError::Decode(e.to_string()))
    }

    fn accounts(&self, action: &str) -> RequestBuilder {
        self.client
            .post(format!("{}/accounts:{}", self.options.auth_base_url, action))
            .query(&[("key", self.options.api_key.as_str())])
    }

    // =========================================================================
    // Identity Toolkit
    // =========================================================================

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let resp: PasswordAuthResponse = self.send(self.accounts("signUp").json(&body)).await?;
        tracing::debug!(local_id = %resp.local_id, "Firebase account created");
        to_session(resp)
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });

        let resp: PasswordAuthResponse = self
            .send(self.accounts("signInWithPassword").json(&body))
            .await?;
        to_session(resp)
    }

    pub async fn send_password_reset_email(&self, email: &str) -> Result<()> {
        let body = serde_json::json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });

        let _: serde_json::Value = self.send(self.accounts("sendOobCode").json(&body)).await?;
        Ok(())
    }

    /// Change the email and/or password of the signed-in account.
    pub async fn update_account(
        &self,
        id_token: &str,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<AccountUpdate> {
        let mut body = serde_json::json!({
            "idToken": id_token,
            "returnSecureToken": true,
        });
        if let Some(email) = email {
            body["email"] = email.into();
        }
        if let Some(password) = password {
            body["password"] = password.into();
        }

        let resp: UpdateAccountResponse = self.send(self.accounts("update").json(&body)).await?;

        let session = match (resp.id_token, resp.refresh_token) {
            (Some(id_token), Some(refresh_token)) => Some(AuthSession {
                local_id: resp.local_id.clone(),
                email: resp.email.clone(),
                id_token,
                refresh_token,
                expires_in: parse_expires_in(resp.expires_in.as_deref().unwrap_or("3600"))?,
            }),
            _ => None,
        };

        Ok(AccountUpdate {
            local_id: resp.local_id,
            email: resp.email,
            session,
        })
    }

    /// Exchange a refresh token for a new id token.
    pub async fn refresh_id_token(&self, refresh_token: &str) -> Result<AuthSession> {
        let url = format!("{}/token", self.options.token_base_url);
        let request = self
            .client
            .post(url)
            .query(&[("key", self.options.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ]);

        let resp: RefreshTokenResponse = self.send(request).await?;
        Ok(AuthSession {
            local_id: resp.user_id,
            email: None,
            id_token: resp.id_token,
            refresh_token: resp.refresh_token,
            expires_in: parse_expires_in(&resp.expires_in)?,
        })
    }

    // =========================================================================
    // Firestore
    // =========================================================================

    fn document_url(&self, collection: &str, doc_id: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}/{}",
            self.options.firestore_base_url, self.options.project_id, collection, doc_id
        )
    }

    /// Fetch a document. A missing document is `Ok(None)`.
    pub async fn get_document(
        &self,
        id_token: &str,
        collection: &str,
        doc_id: &str,
    ) -> Result<Option<Document>> {
        let resp = self
            .client
            .get(self.document_url(collection, doc_id))
            .bearer_auth(id_token)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FirebaseError::from_response(status.as_u16(), &body));
        }

        resp.json::<Document>()
            .await
            .map(Some)
            .map_err(|e| FirebaseError::Decode(e.to_string()))
    }

    /// Create or fully overwrite a document.
    pub async fn set_document(
        &self,
        id_token: &str,
        collection: &str,
        doc_id: &str,
        fields: Fields,
    ) -> Result<Document> {
        let body = Document {
            fields,
            ..Default::default()
        };

        self.send(
            self.client
                .patch(self.document_url(collection, doc_id))
                .bearer_auth(id_token)
                .json(&body),
        )
        .await
    }

    /// Update only the given fields of an existing document.
    /// Fails with `NOT_FOUND` if the document does not exist.
    pub async fn update_document(
        &self,
        id_token: &str,
        collection: &str,
        doc_id: &str,
        fields: Fields,
    ) -> Result<Document> {
        let mut query: Vec<(&str, &str)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.as_str()))
            .collect();
        query.push(("currentDocument.exists", "true"));

        let body = Document {
            fields: fields.clone(),
            ..Default::default()
        };

        self.send(
            self.client
                .patch(self.document_url(collection, doc_id))
                .bearer_auth(id_token)
                .query(&query)
                .json(&body),
        )
        .await
    }
}

fn parse_expires_in(raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| FirebaseError::Decode(format!("invalid expiresIn '{}'", raw)))
}

fn to_session(resp: PasswordAuthResponse) -> Result<AuthSession> {
    Ok(AuthSession {
        expires_in: parse_expires_in(&resp.expires_in)?,
        local_id: resp.local_id,
        email: resp.email,
        id_token: resp.id_token,
        refresh_token: resp.refresh_token,
    })
}
