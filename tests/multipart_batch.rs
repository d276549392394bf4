//! Batch request encoding paired with response decoding.

use async_fcm::multipart::{
    boundary_from_content_type, is_multipart, parse_batch_body, MultipartBatchRequest,
};
use async_fcm::{FcmErrorCode, RawResponse, ResponseDecoder};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::json;

const SEND_PATH: &str = "/v1/projects/p/messages:send";

fn request_with(n: usize) -> MultipartBatchRequest {
    let mut batch = MultipartBatchRequest::with_boundary("batch_test");
    for i in 0..n {
        batch.push_json(
            SEND_PATH,
            &[("Authorization", "Bearer t"), ("Content-Type", "text/plain")],
            &json!({"message": {"token": format!("t{}", i)}}),
        );
    }
    batch
}

/// Echo each request's Content-ID the way the provider does.
fn echo_response(ids: &[String], statuses: &[u16]) -> RawResponse {
    let boundary = "batch_echo";
    let mut body = String::new();
    for (i, (id, status)) in ids.iter().zip(statuses).enumerate() {
        let json = if *status == 200 {
            format!(r#"{{"name": "projects/p/messages/{}"}}"#, i)
        } else {
            r#"{"error": {"code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED",
                "details": [{"@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                             "errorCode": "QUOTA_EXCEEDED"}]}}"#
                .to_string()
        };
        body.push_str(&format!(
            "--{}\r\nContent-Type: application/http\r\nContent-ID: <response-{}>\r\n\r\n\
             HTTP/1.1 {} X\r\nContent-Type: application/json\r\n\r\n{}\r\n",
            boundary, id, status, json
        ));
    }
    body.push_str(&format!("--{}--\r\n", boundary));

    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("multipart/mixed; boundary=batch_echo"),
    );
    RawResponse::new(200, headers, body)
}

#[test]
fn test_request_body_layout() {
    let batch = request_with(2);
    let body = batch.to_body();
    let ids = batch.content_ids();

    assert_eq!(batch.len(), 2);
    assert_eq!(batch.content_type(), "multipart/mixed; boundary=batch_test");
    assert_eq!(body.matches("--batch_test\r\n").count(), 2);
    assert!(body.ends_with("--batch_test--\r\n"));
    for id in &ids {
        assert!(body.contains(&format!("Content-ID: <{}>\r\n", id)));
    }
    assert_eq!(body.matches("POST /v1/projects/p/messages:send HTTP/1.1\r\n").count(), 2);
    assert_eq!(body.matches("Authorization: Bearer t\r\n").count(), 2);
    assert!(!body.contains("text/plain"));
}

#[test]
fn test_request_ids_are_unique() {
    let ids = request_with(50).content_ids();
    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());
}

#[test]
fn test_echoed_ids_correlate_with_request() {
    let batch = request_with(3);
    let ids = batch.content_ids();
    let resp = echo_response(&ids, &[200, 429, 200]);

    let decoded = ResponseDecoder::new().decode_batch_for(&resp, &ids).unwrap();
    assert_eq!(decoded.len(), 3);
    for (outcome, id) in decoded.responses().iter().zip(&ids) {
        assert_eq!(outcome.content_id(), Some(id.as_str()));
    }
    assert_eq!(
        decoded.responses()[1].error().map(|e| e.kind()),
        Some(FcmErrorCode::QuotaExceeded)
    );
    assert_eq!(decoded.success_count(), 2);
}

#[test]
fn test_swapped_ids_keep_physical_order() {
    let ids: Vec<String> = vec!["first".into(), "second".into()];
    let swapped: Vec<String> = vec!["second".into(), "first".into()];
    let resp = echo_response(&swapped, &[200, 200]);

    let decoded = ResponseDecoder::new().decode_batch_for(&resp, &ids).unwrap();
    assert_eq!(decoded.responses()[0].content_id(), Some("second"));
    assert_eq!(decoded.responses()[0].message_id(), Some("projects/p/messages/0"));
}

#[test]
fn test_parse_batch_body_preamble_and_lf_only() {
    let body = "preamble text\n--b1\nContent-ID: response-x\n\nHTTP/1.1 200 OK\n\n{\"name\": \"n\"}\n--b1--\nepilogue";
    let parts = parse_batch_body("multipart/mixed; boundary=\"b1\"", body.as_bytes()).unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].content_id.as_deref(), Some("x"));
    assert_eq!(parts[0].response.status(), 200);
    assert_eq!(parts[0].response.json().unwrap(), json!({"name": "n"}));
}

#[test]
fn test_content_type_helpers() {
    assert!(is_multipart(Some("multipart/mixed; boundary=x")));
    assert!(is_multipart(Some("Multipart/Mixed;boundary=x")));
    assert!(!is_multipart(Some("application/json")));
    assert!(!is_multipart(None));

    assert_eq!(
        boundary_from_content_type("multipart/mixed; boundary=\"quoted\"").unwrap(),
        "quoted"
    );
    assert!(boundary_from_content_type("multipart/mixed").unwrap_err().is_protocol());
    assert!(boundary_from_content_type("application/json; boundary=x")
        .unwrap_err()
        .is_protocol());
}
