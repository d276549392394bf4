//! Response decoding (响应解码与错误归一化).
//!
//! Everything the transport hands back, whether a JSON body, a `multipart/mixed` batch
//! body or a failure signal, is turned into typed outcomes here. Decoding is pure and
//! synchronous; a [`ResponseDecoder`] holds no mutable state and can be shared freely.
//!
//! Per-message failures are returned as [`FcmError`] values inside a [`SendResponse`].
//! Broken provider contracts (malformed multipart, missing `results`) are raised as
//! [`crate::Error::Protocol`].

pub mod classify;
pub mod fcm_error;
pub mod outcome;
pub mod raw;
pub mod topic;

pub use classify::{ProviderCodeTable, FCM_ERROR_TYPE};
pub use fcm_error::FcmError;
pub use outcome::{BatchResponse, SendResponse};
pub use raw::{RawResponse, TransportFailure};
pub use topic::{TopicError, TopicManagementResponse};

use crate::error::ErrorContext;
use crate::error_code::FcmErrorCode;
use crate::multipart::parser;
use crate::{Error, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// Turns raw responses and transport failures into outcomes.
#[derive(Debug, Clone, Default)]
pub struct ResponseDecoder {
    provider_codes: ProviderCodeTable,
}

impl ResponseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an extended FCM `errorCode` table.
    pub fn with_provider_codes(mut self, table: ProviderCodeTable) -> Self {
        self.provider_codes = table;
        self
    }

    pub fn provider_codes(&self) -> &ProviderCodeTable {
        &self.provider_codes
    }

    /// Decode a 2xx send response.
    ///
    /// A non-JSON body is raised as an `UNKNOWN` [`FcmError`]. A JSON body without a
    /// `name` resolves to an `UNKNOWN` failure outcome.
    pub fn decode_success(&self, resp: &RawResponse) -> Result<SendResponse> {
        let body = resp.json().map_err(|e| {
            Error::Fcm(
                FcmError::new(
                    FcmErrorCode::Unknown,
                    format!("Failed to decode FCM response body: {}", e),
                )
                .with_cause(e)
                .with_http_response(resp.clone()),
            )
        })?;

        match body.get("name").and_then(Value::as_str) {
            Some(name) => Ok(SendResponse::success(name)),
            None => Ok(SendResponse::failure(
                FcmError::new(
                    FcmErrorCode::Unknown,
                    format!("FCM response carried no message name: {}", body),
                )
                .with_http_response(resp.clone()),
            )),
        }
    }

    /// Classify a failure without wrapping it in an outcome.
    pub fn classify_failure(&self, failure: &TransportFailure) -> FcmError {
        classify::classify_failure(failure, &self.provider_codes)
    }

    /// Decode a failed send into a failure outcome. The failure is kept as the cause.
    pub fn decode_failure(&self, failure: TransportFailure) -> SendResponse {
        let error = self.classify_failure(&failure);
        debug!(
            kind = %error.kind(),
            http_status = failure.response().map(RawResponse::status),
            "classified FCM failure"
        );
        SendResponse::failure(error.with_cause(failure))
    }

    /// Decode one part's embedded response.
    fn decode_part(&self, resp: RawResponse) -> Result<SendResponse> {
        if resp.status() >= 300 {
            Ok(self.decode_failure(TransportFailure::Status(resp)))
        } else {
            self.decode_success(&resp)
        }
    }

    /// Decode a `multipart/mixed` batch response into outcomes in part order.
    pub fn decode_batch(&self, resp: &RawResponse) -> Result<BatchResponse> {
        let content_type = resp.content_type().ok_or_else(|| {
            Error::protocol_with_context(
                "Batch response has no Content-Type header",
                ErrorContext::new()
                    .with_source("batch_decoder")
                    .with_details(format!("http status: {}", resp.status())),
            )
        })?;

        let parts = parser::parse_batch_body(content_type, resp.body())?;
        let mut responses = Vec::with_capacity(parts.len());
        for part in parts {
            let outcome = self.decode_part(part.response)?;
            responses.push(outcome.with_content_id(part.content_id));
        }

        let batch = BatchResponse::new(responses);
        debug!(
            parts = batch.len(),
            success = batch.success_count(),
            failure = batch.failure_count(),
            "decoded multipart batch"
        );
        Ok(batch)
    }

    /// Like [`decode_batch`](Self::decode_batch), checked against the ids that were sent.
    ///
    /// A part count different from `sent_ids.len()` is raised. A correlation id that does
    /// not match the id sent at the same position is logged; part order is kept.
    pub fn decode_batch_for(&self, resp: &RawResponse, sent_ids: &[String]) -> Result<BatchResponse> {
        let batch = self.decode_batch(resp)?;
        if batch.len() != sent_ids.len() {
            return Err(Error::protocol_with_context(
                "Batch response part count does not match the request",
                ErrorContext::new()
                    .with_source("batch_decoder")
                    .with_details(format!("sent {}, received {}", sent_ids.len(), batch.len())),
            ));
        }

        for (index, (outcome, sent)) in batch.responses().iter().zip(sent_ids).enumerate() {
            if let Some(received) = outcome.content_id().filter(|r| *r != sent.as_str()) {
                warn!(index, sent = %sent, received = %received, "batch part correlation id mismatch");
            }
        }
        Ok(batch)
    }

    /// Decode an IID `batchAdd` / `batchRemove` response.
    pub fn decode_topic_result(&self, resp: &RawResponse) -> Result<TopicManagementResponse> {
        let unexpected = |details: String| {
            Error::protocol_with_context(
                "Unexpected topic management response",
                ErrorContext::new()
                    .with_field_path("results")
                    .with_source("topic_decoder")
                    .with_details(details),
            )
        };

        let body = resp
            .json()
            .map_err(|e| unexpected(format!("body is not JSON: {}", e)))?;
        let results = body
            .get("results")
            .and_then(Value::as_array)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| unexpected(format!("body: {}", body)))?;

        let mut success_count = 0;
        let mut errors = Vec::new();
        for (index, result) in results.iter().enumerate() {
            match result.get("error") {
                Some(Value::String(reason)) => errors.push(TopicError {
                    index,
                    reason: reason.clone(),
                }),
                Some(other) => errors.push(TopicError {
                    index,
                    reason: other.to_string(),
                }),
                None => success_count += 1,
            }
        }
        Ok(TopicManagementResponse::new(success_count, errors))
    }
}
