//! Credentials (凭据).
//!
//! The client never mints tokens itself: it asks a [`TokenProvider`] for a bearer token
//! before each request. Refreshing and caching tokens is the provider's business.

use crate::error::ErrorContext;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// OAuth2 scope requested for FCM access.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Google's OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Supplies bearer tokens for the `Authorization` header.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// A fixed token managed outside the client.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Read the token from an environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        let token = std::env::var(var).map_err(|_| {
            Error::configuration_with_context(
                format!("{} is not set", var),
                ErrorContext::new().with_source("auth"),
            )
        })?;
        if token.trim().is_empty() {
            return Err(Error::Auth(format!("{} is empty", var)));
        }
        Ok(Self::new(token.trim()))
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// The subset of a service-account key file the client reads.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountInfo {
    pub project_id: String,
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountInfo {
    pub fn from_json(json: &str) -> Result<Self> {
        let info: Self = serde_json::from_str(json).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid service account JSON: {}", e),
                ErrorContext::new().with_source("auth"),
            )
        })?;
        if info.project_id.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "Service account has an empty project_id",
                ErrorContext::new()
                    .with_field_path("project_id")
                    .with_source("auth"),
            ));
        }
        Ok(info)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading service account file");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

impl std::fmt::Debug for ServiceAccountInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountInfo")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
