use crate::config::ClientConfig;
use crate::response::{RawResponse, TransportFailure};
use crate::Result;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;

/// Thin POST-only wrapper over a pooled `reqwest::Client`.
///
/// Every call resolves to a fully buffered [`RawResponse`], whatever its status, or to a
/// [`TransportFailure`] when no response was received.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(config.pool_idle_timeout));

        builder = if config.http2 {
            builder
                .http2_adaptive_window(true)
                .http2_keep_alive_interval(Some(Duration::from_secs(30)))
                .http2_keep_alive_timeout(Duration::from_secs(10))
        } else {
            builder.http1_only()
        };

        let client = builder.build().map_err(TransportError::from)?;
        Ok(Self { client })
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn post_json(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
    ) -> std::result::Result<RawResponse, TransportFailure> {
        self.post(url, headers, "application/json; UTF-8", body.to_string())
            .await
    }

    pub async fn post(
        &self,
        url: &str,
        mut headers: HeaderMap,
        content_type: &str,
        body: String,
    ) -> std::result::Result<RawResponse, TransportFailure> {
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| TransportFailure::Other(format!("invalid content type: {}", e)))?;
        headers.insert(CONTENT_TYPE, content_type);

        debug!(url, bytes = body.len(), "POST");
        let resp = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await?;
        let raw = RawResponse::from_reqwest(resp).await?;
        debug!(url, http_status = raw.status(), "response received");
        Ok(raw)
    }
}

/// The HTTP client could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
