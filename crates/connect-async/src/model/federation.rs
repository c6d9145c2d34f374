//! Federation tokens for signing in to the agent console

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GetFederationTokenRequest {
    pub instance_id: String,
}

impl GetFederationTokenRequest {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FederationCredentials {
    pub access_token: String,
    pub access_token_expiration: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expiration: DateTime<Utc>,
}

impl fmt::Debug for FederationCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FederationCredentials")
            .field("access_token", &"<redacted>")
            .field("access_token_expiration", &self.access_token_expiration)
            .field("refresh_token", &"<redacted>")
            .field("refresh_token_expiration", &self.refresh_token_expiration)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetFederationTokenResult {
    pub credentials: FederationCredentials,
}
