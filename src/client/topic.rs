//! Topic subscription management through the Instance ID API.

use super::core::{header_text, FcmClient, HEADER_REQUEST_ID};
use super::TOPIC_MAX_TOKENS;
use crate::error::ErrorContext;
use crate::response::{RawResponse, TopicManagementResponse};
use crate::utils::join_url;
use crate::{Error, Result};
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::json;
use std::time::Instant;
use tracing::info;

const TOPIC_ADD_ACTION: &str = "iid/v1:batchAdd";
const TOPIC_REMOVE_ACTION: &str = "iid/v1:batchRemove";
const TOPIC_PREFIX: &str = "/topics/";

/// `/topics/{name}` for a bare or already prefixed topic name.
fn topic_path(topic: &str) -> Result<String> {
    let name = topic.strip_prefix(TOPIC_PREFIX).unwrap_or(topic).trim();
    if name.is_empty() {
        return Err(Error::validation_with_context(
            "Topic name must not be empty",
            ErrorContext::new().with_field_path("topic"),
        ));
    }
    Ok(format!("{}{}", TOPIC_PREFIX, name))
}

impl FcmClient {
    pub async fn subscribe_devices_to_topic(
        &self,
        device_tokens: &[String],
        topic: &str,
    ) -> Result<TopicManagementResponse> {
        self.manage_topic(device_tokens, topic, TOPIC_ADD_ACTION).await
    }

    pub async fn unsubscribe_devices_from_topic(
        &self,
        device_tokens: &[String],
        topic: &str,
    ) -> Result<TopicManagementResponse> {
        self.manage_topic(device_tokens, topic, TOPIC_REMOVE_ACTION).await
    }

    async fn manage_topic(
        &self,
        device_tokens: &[String],
        topic: &str,
        action: &str,
    ) -> Result<TopicManagementResponse> {
        if device_tokens.is_empty() || device_tokens.len() > TOPIC_MAX_TOKENS {
            return Err(Error::validation_with_context(
                format!("Between 1 and {} device tokens are required", TOPIC_MAX_TOKENS),
                ErrorContext::new()
                    .with_field_path("registration_tokens")
                    .with_details(format!("got {}", device_tokens.len())),
            ));
        }
        if device_tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(Error::validation_with_context(
                "Device tokens must not be empty",
                ErrorContext::new().with_field_path("registration_tokens"),
            ));
        }

        let payload = json!({
            "to": topic_path(topic)?,
            "registration_tokens": device_tokens,
        });

        let token = self.access_token().await?;
        let mut headers = self.request_headers(&token)?;
        headers.insert(
            HeaderName::from_static("access_token_auth"),
            HeaderValue::from_static("true"),
        );
        let request_id = header_text(&headers, HEADER_REQUEST_ID);

        let url = join_url(&self.config.iid_url, &[action]);
        let start = Instant::now();
        let resp = self
            .transport
            .post_json(&url, headers, &payload)
            .await
            .and_then(RawResponse::error_for_status)
            .map_err(|failure| {
                let err = self.decoder.classify_failure(&failure).with_cause(failure);
                info!(
                    error_kind = err.kind().name(),
                    request_id = request_id.as_str(),
                    action,
                    "topic management request failed"
                );
                Error::Fcm(err)
            })?;

        let result = self.decoder.decode_topic_result(&resp)?;
        if result.total() != device_tokens.len() {
            return Err(Error::protocol_with_context(
                "Topic management result count does not match the submitted tokens",
                ErrorContext::new()
                    .with_field_path("results")
                    .with_details(format!(
                        "sent {}, received {}",
                        device_tokens.len(),
                        result.total()
                    )),
            ));
        }

        info!(
            action,
            success = result.success_count(),
            failure = result.failure_count(),
            request_id = request_id.as_str(),
            duration_ms = start.elapsed().as_millis(),
            "topic management request finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_path_accepts_prefixed_names() {
        assert_eq!(topic_path("news").unwrap(), "/topics/news");
        assert_eq!(topic_path("/topics/news").unwrap(), "/topics/news");
        assert!(topic_path("/topics/").unwrap_err().is_validation());
    }
}
