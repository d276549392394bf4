//! `multipart/mixed` batch request encoder.

use uuid::Uuid;

const CRLF: &str = "\r\n";

#[derive(Debug, Clone)]
struct SubRequest {
    content_id: String,
    http: String,
}

/// A batch of embedded `application/http` requests sent as one body.
///
/// Every sub-request gets a `Content-ID: <uuid>`; the provider echoes it back as
/// `response-<uuid>` on the matching response part.
#[derive(Debug, Clone)]
pub struct MultipartBatchRequest {
    boundary: String,
    parts: Vec<SubRequest>,
}

impl MultipartBatchRequest {
    pub fn new() -> Self {
        Self::with_boundary(format!("batch_{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Append a `POST <path>` sub-request with a JSON body. Returns its correlation id.
    pub fn push_json(
        &mut self,
        path: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> String {
        let content_id = Uuid::new_v4().to_string();
        let payload = body.to_string();

        let mut http = format!("POST {} HTTP/1.1{}", path, CRLF);
        for (name, value) in headers {
            // Content-Type and Content-Length are owned by the encoder.
            if name.eq_ignore_ascii_case("content-type") || name.eq_ignore_ascii_case("content-length")
            {
                continue;
            }
            http.push_str(&format!("{}: {}{}", name, value, CRLF));
        }
        http.push_str(&format!("Content-Type: application/json; charset=UTF-8{}", CRLF));
        http.push_str(&format!("Content-Length: {}{}", payload.len(), CRLF));
        http.push_str(CRLF);
        http.push_str(&payload);

        self.parts.push(SubRequest {
            content_id: content_id.clone(),
            http,
        });
        content_id
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Correlation ids in submission order.
    pub fn content_ids(&self) -> Vec<String> {
        self.parts.iter().map(|p| p.content_id.clone()).collect()
    }

    pub fn content_type(&self) -> String {
        format!("multipart/mixed; boundary={}", self.boundary)
    }

    pub fn to_body(&self) -> String {
        let mut body = String::new();
        for part in &self.parts {
            body.push_str(&format!("--{}{}", self.boundary, CRLF));
            body.push_str(&format!("Content-Type: application/http{}", CRLF));
            body.push_str(&format!("Content-Transfer-Encoding: binary{}", CRLF));
            body.push_str(&format!("Content-ID: <{}>{}", part.content_id, CRLF));
            body.push_str(CRLF);
            body.push_str(&part.http);
            body.push_str(CRLF);
        }
        body.push_str(&format!("--{}--{}", self.boundary, CRLF));
        body
    }
}

impl Default for MultipartBatchRequest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::parser::{header_lines, split_body, split_head};
    use serde_json::json;

    #[test]
    fn body_splits_back_into_tagged_sub_requests() {
        let mut batch = MultipartBatchRequest::new();
        let a = batch.push_json(
            "/v1/projects/p/messages:send",
            &[("Authorization", "Bearer t"), ("Content-Type", "text/plain")],
            &json!({"message": {"token": "a"}}),
        );
        let b = batch.push_json(
            "/v1/projects/p/messages:send",
            &[],
            &json!({"message": {"token": "b"}}),
        );
        assert_eq!(batch.content_ids(), vec![a.clone(), b.clone()]);
        assert!(batch.boundary().starts_with("batch_"));

        let parts = split_body(&batch.content_type(), batch.to_body().as_bytes()).unwrap();
        assert_eq!(parts.len(), 2);

        for (part, (id, token)) in parts.iter().zip([(&a, "a"), (&b, "b")]) {
            let (outer, inner) = split_head(part).unwrap();
            let content_id = header_lines(outer)
                .find(|(k, _)| *k == "Content-ID")
                .map(|(_, v)| v.to_string());
            assert_eq!(content_id, Some(format!("<{}>", id)));

            let (head, payload) = split_head(inner).unwrap();
            assert!(head.starts_with("POST /v1/projects/p/messages:send HTTP/1.1\r\n"));
            assert_eq!(head.matches("Content-Type").count(), 1);
            assert!(head.contains(&format!("Content-Length: {}", payload.len())));
            let payload: serde_json::Value = serde_json::from_str(payload).unwrap();
            assert_eq!(payload["message"]["token"], token);
        }
    }

    #[test]
    fn empty_batch_still_closes() {
        let batch = MultipartBatchRequest::with_boundary("b");
        assert!(batch.is_empty());
        assert_eq!(batch.to_body(), "--b--\r\n");
        assert_eq!(batch.content_type(), "multipart/mixed; boundary=b");
    }
}
