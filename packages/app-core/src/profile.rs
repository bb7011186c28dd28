//! User profile documents.
//!
//! One document per account in the `users` collection, keyed by uid.

use async_trait::async_trait;
use firebase::{Document, Fields, FirebaseClient, Value};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};

pub const USERS_COLLECTION: &str = "users";

const FIRST_NAME: &str = "firstName";
const LAST_NAME: &str = "lastName";
const DATE_OF_BIRTH: &str = "dateOfBirth";
const EMAIL: &str = "email";
const CREATED_AT: &str = "createdAt";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    pub email: Option<String>,
    /// Milliseconds since the Unix epoch
    pub created_at: Option<i64>,
}

impl UserProfile {
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(FIRST_NAME.into(), self.first_name.as_str().into());
        fields.insert(LAST_NAME.into(), self.last_name.as_str().into());
        fields.insert(DATE_OF_BIRTH.into(), self.date_of_birth.as_str().into());
        fields.insert(
            EMAIL.into(),
            match &self.email {
                Some(email) => email.as_str().into(),
                None => Value::NullValue(()),
            },
        );
        if let Some(created_at) = self.created_at {
            fields.insert(CREATED_AT.into(), created_at.into());
        }
        fields
    }

    /// Missing fields read as empty, matching documents written by older clients.
    pub fn from_document(doc: &Document) -> Self {
        let text = |field: &str| doc.get_str(field).unwrap_or_default().to_string();
        Self {
            first_name: text(FIRST_NAME),
            last_name: text(LAST_NAME),
            date_of_birth: text(DATE_OF_BIRTH),
            email: doc.get_str(EMAIL).map(str::to_string),
            created_at: doc.get_i64(CREATED_AT),
        }
    }
}

/// The editable part of a profile
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

impl ProfileUpdate {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(FIRST_NAME.into(), self.first_name.as_str().into());
        fields.insert(LAST_NAME.into(), self.last_name.as_str().into());
        fields.insert(DATE_OF_BIRTH.into(), self.date_of_birth.as_str().into());
        fields
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create(&self, id_token: &str, uid: &str, profile: &UserProfile) -> Result<()>;

    async fn load(&self, id_token: &str, uid: &str) -> Result<Option<UserProfile>>;

    /// Only the fields in `update` are written.
    async fn update(&self, id_token: &str, uid: &str, update: &ProfileUpdate) -> Result<()>;
}

/// Firestore backed profiles
pub struct FirestoreProfiles(pub Arc<FirebaseClient>);

impl FirestoreProfiles {
    pub fn new(client: Arc<FirebaseClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl ProfileStore for FirestoreProfiles {
    async fn create(&self, id_token: &str, uid: &str, profile: &UserProfile) -> Result<()> {
        self.0
            .set_document(id_token, USERS_COLLECTION, uid, profile.to_fields())
            .await
            .map_err(AppError::Profile)?;
        Ok(())
    }

    async fn load(&self, id_token: &str, uid: &str) -> Result<Option<UserProfile>> {
        let doc = self
            .0
            .get_document(id_token, USERS_COLLECTION, uid)
            .await
            .map_err(AppError::Profile)?;
        Ok(doc.as_ref().map(UserProfile::from_document))
    }

    async fn update(&self, id_token: &str, uid: &str, update: &ProfileUpdate) -> Result<()> {
        self.0
            .update_document(id_token, USERS_COLLECTION, uid, update.to_fields())
            .await
            .map_err(AppError::Profile)?;
        Ok(())
    }
}
