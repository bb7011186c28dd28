use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque token binding one redirect flow to the client that started it.
///
/// Not stored by the gateway: the client keeps it and sends it back on
/// confirmation, where the processor checks it against the flow.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Fresh token from 122 random bits (UUID v4), rendered as 32 hex chars.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}
