use crate::auth::{ServiceAccountInfo, StaticTokenProvider, TokenProvider};
use crate::client::core::FcmClient;
use crate::config::ClientConfig;
use crate::error::ErrorContext;
use crate::response::{ProviderCodeTable, ResponseDecoder};
use crate::transport::HttpTransport;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`FcmClient`].
///
/// Configuration starts from [`ClientConfig::from_env`]; explicit setters win.
pub struct FcmClientBuilder {
    config: ClientConfig,
    project_id: Option<String>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    provider_codes: Option<ProviderCodeTable>,
    http_client: Option<reqwest::Client>,
}

impl FcmClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::from_env(),
            project_id: None,
            token_provider: None,
            provider_codes: None,
            http_client: None,
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Take the project id from a service account. Tokens still come from the provider.
    pub fn with_service_account(mut self, info: &ServiceAccountInfo) -> Self {
        self.project_id = Some(info.project_id.clone());
        self
    }

    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Shorthand for a [`StaticTokenProvider`].
    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        self.with_token_provider(Arc::new(StaticTokenProvider::new(token)))
    }

    /// Override the FCM base URL (primarily for testing with mock servers).
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Override the Instance ID base URL used for topic management.
    pub fn iid_url_override(mut self, iid_url: impl Into<String>) -> Self {
        self.config.iid_url = iid_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_send_concurrency(mut self, n: usize) -> Self {
        self.config.send_concurrency = n.max(1);
        self
    }

    /// Classify FCM `errorCode` values with an extended table.
    pub fn with_provider_codes(mut self, table: ProviderCodeTable) -> Self {
        self.provider_codes = Some(table);
        self
    }

    /// Use a preconfigured `reqwest::Client` instead of one built from the config.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<FcmClient> {
        validate_base_url("base_url", &self.config.base_url)?;
        validate_base_url("iid_url", &self.config.iid_url)?;

        let project_id = self
            .project_id
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration_with_context(
                    "A project id is required",
                    ErrorContext::new()
                        .with_field_path("project_id")
                        .with_source("client_builder"),
                )
            })?;

        let token_provider = self.token_provider.ok_or_else(|| {
            Error::configuration_with_context(
                "A token provider is required",
                ErrorContext::new()
                    .with_field_path("token_provider")
                    .with_source("client_builder"),
            )
        })?;

        let transport = match self.http_client {
            Some(client) => HttpTransport::with_client(client),
            None => HttpTransport::new(&self.config)?,
        };

        let mut decoder = ResponseDecoder::new();
        if let Some(table) = self.provider_codes {
            decoder = decoder.with_provider_codes(table);
        }

        Ok(FcmClient {
            config: self.config,
            project_id,
            transport,
            token_provider,
            decoder,
        })
    }
}

impl Default for FcmClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value).map_err(|e| {
        Error::configuration_with_context(
            format!("Invalid URL: {}", e),
            ErrorContext::new()
                .with_field_path(field)
                .with_details(value.to_string())
                .with_source("client_builder"),
        )
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::configuration_with_context(
            format!("Unsupported URL scheme: {}", parsed.scheme()),
            ErrorContext::new()
                .with_field_path(field)
                .with_source("client_builder"),
        ));
    }
    Ok(())
}
