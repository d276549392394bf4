//! Error classification: transport failures, HTTP statuses and FCM-specific error codes.
//!
//! Classification is layered. A failure that carries a decodable FCM error detail is
//! classified by [`classify_provider_error`] first; everything else falls through to
//! [`classify_transport_failure`] / [`classify_http_status`].

use super::fcm_error::FcmError;
use super::raw::{RawResponse, TransportFailure};
use crate::error_code::FcmErrorCode;
use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// `@type` discriminator of the FCM error entry inside `error.details[]`.
pub const FCM_ERROR_TYPE: &str = "type.googleapis.com/google.firebase.fcm.v1.FcmError";

/// Maps FCM `errorCode` values to refined taxonomy kinds.
///
/// Codes missing from the table fall through to generic status classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCodeTable {
    codes: HashMap<String, FcmErrorCode>,
}

static STANDARD_PROVIDER_CODES: Lazy<ProviderCodeTable> = Lazy::new(|| {
    ProviderCodeTable::empty()
        .with_code("APNS_AUTH_ERROR", FcmErrorCode::ThirdPartyAuth)
        .with_code("THIRD_PARTY_AUTH_ERROR", FcmErrorCode::ThirdPartyAuth)
        .with_code("QUOTA_EXCEEDED", FcmErrorCode::QuotaExceeded)
        .with_code("SENDER_ID_MISMATCH", FcmErrorCode::SenderIdMismatch)
        .with_code("UNREGISTERED", FcmErrorCode::Unregistered)
});

impl ProviderCodeTable {
    pub fn empty() -> Self {
        Self {
            codes: HashMap::new(),
        }
    }

    /// The table of documented FCM error codes.
    pub fn standard() -> &'static ProviderCodeTable {
        &STANDARD_PROVIDER_CODES
    }

    pub fn with_code(mut self, error_code: impl Into<String>, kind: FcmErrorCode) -> Self {
        self.codes.insert(error_code.into(), kind);
        self
    }

    pub fn lookup(&self, error_code: &str) -> Option<FcmErrorCode> {
        self.codes.get(error_code).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for ProviderCodeTable {
    fn default() -> Self {
        Self::standard().clone()
    }
}

/// Extract the `error` object of a Google API error body.
pub(crate) fn error_object(body: &Value) -> Option<&Map<String, Value>> {
    body.get("error").and_then(Value::as_object)
}

/// Find the FCM `errorCode` in `error.details[]`, if any.
pub fn fcm_error_code(error: &Map<String, Value>) -> Option<&str> {
    error
        .get("details")
        .and_then(Value::as_array)?
        .iter()
        .find(|d| d.get("@type").and_then(Value::as_str) == Some(FCM_ERROR_TYPE))
        .and_then(|d| d.get("errorCode"))
        .and_then(Value::as_str)
}

fn body_message(error: Option<&Map<String, Value>>) -> Option<String> {
    error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

fn unexpected_response_message(resp: &RawResponse) -> String {
    format!(
        "Unexpected HTTP response with status: {}; body: {}",
        resp.status(),
        resp.text()
    )
}

/// Classify a failed response by its FCM-specific error code.
///
/// Returns `None` when the body is not JSON, carries no FCM detail entry, or the
/// detail's `errorCode` is not in `table`.
pub fn classify_provider_error(resp: &RawResponse, table: &ProviderCodeTable) -> Option<FcmError> {
    let body = resp.json().ok()?;
    let error = error_object(&body)?;
    let kind = table.lookup(fcm_error_code(error)?)?;
    let message = body_message(Some(error)).unwrap_or_else(|| unexpected_response_message(resp));
    Some(FcmError::new(kind, message).with_http_response(resp.clone()))
}

/// Classify a failed response by its `error.status` field or, failing that, its HTTP status.
pub fn classify_http_status(resp: &RawResponse) -> FcmError {
    let body = resp.json().ok();
    let error = body.as_ref().and_then(error_object);

    let kind = match error.and_then(|e| e.get("status")).and_then(Value::as_str) {
        Some(status) => FcmErrorCode::from_status(status),
        None => FcmErrorCode::from_http_status(resp.status()),
    };
    let message = body_message(error).unwrap_or_else(|| unexpected_response_message(resp));

    FcmError::new(kind, message).with_http_response(resp.clone())
}

/// Classify any transport failure without consulting FCM error details.
pub fn classify_transport_failure(failure: &TransportFailure) -> FcmError {
    match failure {
        TransportFailure::Timeout(detail) => FcmError::new(
            FcmErrorCode::DeadlineExceeded,
            format!("Timed out while making an API call: {}", detail),
        ),
        TransportFailure::Connect(detail) => FcmError::new(
            FcmErrorCode::Unavailable,
            format!("Failed to establish a connection: {}", detail),
        ),
        TransportFailure::Other(detail) => FcmError::new(
            FcmErrorCode::Unknown,
            format!("Unknown error while making a remote call: {}", detail),
        ),
        TransportFailure::Status(resp) => classify_http_status(resp),
    }
}

/// Full classification: provider detail first, then transport/status.
pub fn classify_failure(failure: &TransportFailure, table: &ProviderCodeTable) -> FcmError {
    failure
        .response()
        .and_then(|resp| classify_provider_error(resp, table))
        .unwrap_or_else(|| classify_transport_failure(failure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use serde_json::json;

    fn error_response(status: u16, body: Value) -> RawResponse {
        RawResponse::json_body(status, &body)
    }

    #[test]
    fn status_field_wins_over_http_code() {
        let resp = error_response(
            500,
            json!({"error": {"code": 500, "message": "boom", "status": "UNAVAILABLE"}}),
        );
        let err = classify_http_status(&resp);
        assert_eq!(err.kind(), FcmErrorCode::Unavailable);
        assert_eq!(err.message(), "boom");
        assert_eq!(err.http_response().unwrap().status(), 500);
    }

    #[test]
    fn unrecognized_status_string_is_unknown() {
        let resp = error_response(400, json!({"error": {"message": "m", "status": "WEIRD"}}));
        assert_eq!(classify_http_status(&resp).kind(), FcmErrorCode::Unknown);
    }

    #[test]
    fn non_json_body_synthesizes_message() {
        let resp = RawResponse::new(502, HeaderMap::new(), "Bad Gateway");
        let err = classify_http_status(&resp);
        assert_eq!(err.kind(), FcmErrorCode::Unknown);
        assert_eq!(
            err.message(),
            "Unexpected HTTP response with status: 502; body: Bad Gateway"
        );
    }

    #[test]
    fn missing_message_synthesizes_message() {
        let resp = error_response(404, json!({"error": {"code": 404}}));
        let err = classify_http_status(&resp);
        assert_eq!(err.kind(), FcmErrorCode::NotFound);
        assert!(err.message().starts_with("Unexpected HTTP response with status: 404"));
    }

    #[test]
    fn transport_failures_map_to_fixed_kinds() {
        let timeout = classify_transport_failure(&TransportFailure::Timeout("read".into()));
        assert_eq!(timeout.kind(), FcmErrorCode::DeadlineExceeded);
        assert!(timeout.message().contains("Timed out"));

        let connect = classify_transport_failure(&TransportFailure::Connect("refused".into()));
        assert_eq!(connect.kind(), FcmErrorCode::Unavailable);
        assert!(connect.message().contains("Failed to establish a connection"));

        let other = classify_transport_failure(&TransportFailure::Other("decode".into()));
        assert_eq!(other.kind(), FcmErrorCode::Unknown);
        assert!(other.message().contains("Unknown error while making a remote call"));
    }

    #[test]
    fn provider_code_lookup_ignores_other_detail_types() {
        let error = json!({
            "message": "some error",
            "details": [{"@type": "some.other.type", "errorCode": "UNREGISTERED"}],
        });
        assert_eq!(fcm_error_code(error.as_object().unwrap()), None);

        let error = json!({"message": "some error"});
        assert_eq!(fcm_error_code(error.as_object().unwrap()), None);
    }

    #[test]
    fn provider_codes_map_to_refined_kinds() {
        let cases = [
            (401, "APNS_AUTH_ERROR", FcmErrorCode::ThirdPartyAuth),
            (401, "THIRD_PARTY_AUTH_ERROR", FcmErrorCode::ThirdPartyAuth),
            (429, "QUOTA_EXCEEDED", FcmErrorCode::QuotaExceeded),
            (403, "SENDER_ID_MISMATCH", FcmErrorCode::SenderIdMismatch),
            (404, "UNREGISTERED", FcmErrorCode::Unregistered),
        ];
        for (status, code, expected) in cases {
            let resp = error_response(
                status,
                json!({"error": {
                    "code": status,
                    "message": "provider said no",
                    "details": [{"@type": FCM_ERROR_TYPE, "errorCode": code}],
                }}),
            );
            let err = classify_provider_error(&resp, ProviderCodeTable::standard()).unwrap();
            assert_eq!(err.kind(), expected, "errorCode {}", code);
            assert_eq!(err.message(), "provider said no");
        }
    }

    #[test]
    fn unmapped_provider_code_falls_through() {
        let resp = error_response(
            400,
            json!({"error": {
                "message": "bad",
                "status": "INVALID_ARGUMENT",
                "details": [{"@type": FCM_ERROR_TYPE, "errorCode": "INVALID_ARGUMENT"}],
            }}),
        );
        let table = ProviderCodeTable::standard();
        assert!(classify_provider_error(&resp, table).is_none());

        let err = classify_failure(&TransportFailure::Status(resp), table);
        assert_eq!(err.kind(), FcmErrorCode::InvalidArgument);
    }

    #[test]
    fn extended_table_is_consulted() {
        let resp = error_response(
            400,
            json!({"error": {
                "message": "bad",
                "details": [{"@type": FCM_ERROR_TYPE, "errorCode": "NEW_CODE"}],
            }}),
        );
        let table = ProviderCodeTable::standard()
            .clone()
            .with_code("NEW_CODE", FcmErrorCode::Unregistered);
        let err = classify_failure(&TransportFailure::Status(resp), &table);
        assert_eq!(err.kind(), FcmErrorCode::Unregistered);
    }
}
