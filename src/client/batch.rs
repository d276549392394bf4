//! Batch sending: concurrent per-message fan-out and single multipart requests.

use super::core::{failure_for, header_text, FcmClient, HEADER_REQUEST_ID};
use super::{BATCH_MAX_MESSAGES, MULTICAST_MAX_TOKENS};
use crate::error::ErrorContext;
use crate::messages::{assemble_push_notification, Message, MulticastMessage};
use crate::multipart::{is_multipart, MultipartBatchRequest};
use crate::response::{BatchResponse, SendResponse, TransportFailure};
use crate::utils::join_url;
use crate::{Error, Result};
use futures::StreamExt;
use reqwest::header::AUTHORIZATION;
use std::time::Instant;
use tracing::{info, warn};

const BATCH_ENDPOINT: &str = "/batch";

fn too_many(what: &str, limit: usize, got: usize) -> Error {
    Error::validation_with_context(
        format!("Can not send more than {} {} in a single request", limit, what),
        ErrorContext::new().with_details(format!("got {}", got)),
    )
}

impl FcmClient {
    /// Send up to 500 messages concurrently, one `messages:send` call each.
    ///
    /// Outcomes are index-aligned with `messages`. A failing item never aborts the
    /// others; unexpected per-item errors become `UNKNOWN` outcomes.
    pub async fn send_each(&self, messages: &[Message], dry_run: bool) -> Result<BatchResponse> {
        if messages.len() > BATCH_MAX_MESSAGES {
            return Err(too_many("messages", BATCH_MAX_MESSAGES, messages.len()));
        }
        let payloads = messages
            .iter()
            .map(|m| assemble_push_notification(m, dry_run))
            .collect::<Result<Vec<_>>>()?;
        if payloads.is_empty() {
            return Ok(BatchResponse::default());
        }

        let token = self.access_token().await?;
        let n = payloads.len();
        let limit = self.config.send_concurrency.max(1);
        let mut out: Vec<Option<Result<SendResponse>>> = (0..n).map(|_| None).collect();

        let token = token.as_str();
        let results: Vec<(usize, Result<SendResponse>)> =
            futures::stream::iter(payloads.iter().enumerate())
                .map(|(idx, payload)| async move {
                    let r = match self.request_headers(token) {
                        Ok(headers) => self.post_message(headers, payload).await,
                        Err(e) => Err(e),
                    };
                    (idx, r)
                })
                .buffer_unordered(limit)
                .collect()
                .await;

        for (idx, r) in results {
            out[idx] = Some(r);
        }

        let batch = BatchResponse::from_results(
            out.into_iter()
                .map(|o| o.unwrap_or_else(|| Err(Error::protocol("batch result missing"))))
                .collect(),
        );
        info!(
            messages = n,
            success = batch.success_count(),
            failure = batch.failure_count(),
            "fcm send_each finished"
        );
        Ok(batch)
    }

    /// [`send_each`](Self::send_each) for one payload fanned out to up to 500 tokens.
    pub async fn send_each_for_multicast(
        &self,
        multicast: &MulticastMessage,
        dry_run: bool,
    ) -> Result<BatchResponse> {
        if multicast.tokens.len() > MULTICAST_MAX_TOKENS {
            return Err(too_many("device tokens", MULTICAST_MAX_TOKENS, multicast.tokens.len()));
        }
        self.send_each(&multicast.to_messages(), dry_run).await
    }

    /// Send up to 500 messages as one `multipart/mixed` request to `{base}/batch`.
    ///
    /// When the provider answers without a multipart body, the transport or HTTP
    /// failure is reported once per submitted message.
    pub async fn send_batch(&self, messages: &[Message], dry_run: bool) -> Result<BatchResponse> {
        if messages.len() > BATCH_MAX_MESSAGES {
            return Err(too_many("messages", BATCH_MAX_MESSAGES, messages.len()));
        }
        let payloads = messages
            .iter()
            .map(|m| assemble_push_notification(m, dry_run))
            .collect::<Result<Vec<_>>>()?;
        if payloads.is_empty() {
            return Ok(BatchResponse::default());
        }

        let token = self.access_token().await?;
        let headers = self.request_headers(&token)?;
        let bearer = header_text(&headers, AUTHORIZATION.as_str());
        let request_id = header_text(&headers, HEADER_REQUEST_ID);

        let path = self.send_path();
        let mut batch = MultipartBatchRequest::new();
        for payload in &payloads {
            batch.push_json(&path, &[(AUTHORIZATION.as_str(), bearer.as_str())], payload);
        }
        let sent_ids = batch.content_ids();

        let url = join_url(&self.config.base_url, &[BATCH_ENDPOINT]);
        let start = Instant::now();
        let result = self
            .transport
            .post(&url, headers, &batch.content_type(), batch.to_body())
            .await;

        let decoded = match result {
            Ok(resp) if is_multipart(resp.content_type()) => {
                self.decoder.decode_batch_for(&resp, &sent_ids)?
            }
            Ok(resp) if !resp.is_success() => {
                replicate(self, TransportFailure::Status(resp), payloads.len())
            }
            Ok(resp) => {
                return Err(Error::protocol_with_context(
                    "Batch endpoint answered without a multipart body",
                    ErrorContext::new()
                        .with_source("send_batch")
                        .with_details(format!(
                            "http status: {}; content-type: {}",
                            resp.status(),
                            resp.content_type().unwrap_or("<none>")
                        )),
                ))
            }
            Err(failure) => replicate(self, failure, payloads.len()),
        };

        info!(
            messages = payloads.len(),
            success = decoded.success_count(),
            failure = decoded.failure_count(),
            request_id = request_id.as_str(),
            duration_ms = start.elapsed().as_millis(),
            "fcm batch request finished"
        );
        Ok(decoded)
    }

    /// [`send_batch`](Self::send_batch) for one payload fanned out to up to 500 tokens.
    pub async fn send_multicast(
        &self,
        multicast: &MulticastMessage,
        dry_run: bool,
    ) -> Result<BatchResponse> {
        if multicast.tokens.len() > MULTICAST_MAX_TOKENS {
            return Err(too_many("device tokens", MULTICAST_MAX_TOKENS, multicast.tokens.len()));
        }
        self.send_batch(&multicast.to_messages(), dry_run).await
    }
}

fn replicate(client: &FcmClient, failure: TransportFailure, n: usize) -> BatchResponse {
    warn!(error = %failure, messages = n, "fcm batch request failed as a whole");
    BatchResponse::new(
        (0..n)
            .map(|_| failure_for(client.decoder(), &failure))
            .collect(),
    )
}
