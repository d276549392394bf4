use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::messages::{assemble_push_notification, Message};
use crate::response::{RawResponse, ResponseDecoder, SendResponse, TransportFailure};
use crate::transport::HttpTransport;
use crate::utils::join_url;
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
const HEADER_API_FORMAT_VERSION: &str = "x-goog-api-format-version";
const HEADER_FIREBASE_CLIENT: &str = "x-firebase-client";

/// Asynchronous FCM HTTP v1 client.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct FcmClient {
    pub(crate) config: ClientConfig,
    pub(crate) project_id: String,
    pub(crate) transport: HttpTransport,
    pub(crate) token_provider: Arc<dyn TokenProvider>,
    pub(crate) decoder: ResponseDecoder,
}

impl fmt::Debug for FcmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FcmClient")
            .field("project_id", &self.project_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FcmClient {
    pub fn builder() -> crate::client::FcmClientBuilder {
        crate::client::FcmClientBuilder::new()
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn decoder(&self) -> &ResponseDecoder {
        &self.decoder
    }

    /// `{base}/v1/projects/{project}/messages:send`
    pub fn send_url(&self) -> String {
        join_url(&self.config.base_url, &[&self.send_path()])
    }

    pub(crate) fn send_path(&self) -> String {
        format!("/v1/projects/{}/messages:send", self.project_id)
    }

    /// Fetch a bearer token. Any provider failure is reported as [`Error::Auth`].
    pub(crate) async fn access_token(&self) -> Result<String> {
        match self.token_provider.access_token().await {
            Ok(token) => Ok(token),
            Err(Error::Auth(msg)) => Err(Error::Auth(msg)),
            Err(other) => Err(Error::Auth(other.to_string())),
        }
    }

    /// Headers for one request, each with a fresh `X-Request-Id`.
    pub(crate) fn request_headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Auth("Access token contains invalid header characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            HeaderName::from_static(HEADER_REQUEST_ID),
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .map_err(|e| Error::validation(e.to_string()))?,
        );
        headers.insert(
            HeaderName::from_static(HEADER_API_FORMAT_VERSION),
            HeaderValue::from_static("2"),
        );
        headers.insert(
            HeaderName::from_static(HEADER_FIREBASE_CLIENT),
            HeaderValue::from_static(concat!("async-fcm/", env!("CARGO_PKG_VERSION"))),
        );
        Ok(headers)
    }

    /// Send one message.
    ///
    /// Delivery failures come back as a failed [`SendResponse`]; only invalid input,
    /// credential failures and undecodable success bodies are raised.
    pub async fn send(&self, message: &Message, dry_run: bool) -> Result<SendResponse> {
        let payload = assemble_push_notification(message, dry_run)?;
        let token = self.access_token().await?;
        let headers = self.request_headers(&token)?;
        self.post_message(headers, &payload).await
    }

    /// POST one assembled payload to `messages:send` and decode the outcome.
    pub(crate) async fn post_message(
        &self,
        headers: HeaderMap,
        payload: &serde_json::Value,
    ) -> Result<SendResponse> {
        let url = self.send_url();
        let request_id = header_text(&headers, HEADER_REQUEST_ID);
        let start = Instant::now();

        let result = self
            .transport
            .post_json(&url, headers, payload)
            .await
            .and_then(RawResponse::error_for_status);

        match result {
            Ok(resp) => {
                let outcome = self.decoder.decode_success(&resp)?;
                info!(
                    http_status = resp.status(),
                    request_id = request_id.as_str(),
                    message_id = outcome.message_id().unwrap_or(""),
                    duration_ms = start.elapsed().as_millis(),
                    "fcm message sent"
                );
                Ok(outcome)
            }
            Err(failure) => {
                let outcome = self.decoder.decode_failure(failure);
                log_failure(&outcome, &request_id, start);
                Ok(outcome)
            }
        }
    }
}

pub(crate) fn header_text(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

pub(crate) fn log_failure(outcome: &SendResponse, request_id: &str, start: Instant) {
    if let Some(err) = outcome.error() {
        let http_status = err.http_response().map(RawResponse::status);
        info!(
            http_status,
            error_kind = err.kind().name(),
            standard_code = err.code(),
            request_id,
            duration_ms = start.elapsed().as_millis(),
            "fcm message failed"
        );
    }
}

/// Failure outcome for a request that produced no usable response.
pub(crate) fn failure_for(decoder: &ResponseDecoder, failure: &TransportFailure) -> SendResponse {
    decoder.decode_failure(failure.clone())
}
