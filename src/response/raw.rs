//! Raw HTTP responses and transport failure signals consumed by the decoders.

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_TYPE};

/// A fully buffered HTTP response.
///
/// Both real responses (see [`RawResponse::from_reqwest`]) and the synthetic responses
/// embedded in a multipart batch body are represented this way.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    status: u16,
    headers: HeaderMap,
    body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Build a JSON response with a matching `content-type` header.
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json; charset=UTF-8"),
        );
        Self::new(status, headers, body.to_string())
    }

    /// Drain a `reqwest::Response` into memory.
    pub async fn from_reqwest(resp: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Lossy UTF-8 rendering of the body.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into a [`TransportFailure::Status`].
    pub fn error_for_status(self) -> Result<Self, TransportFailure> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportFailure::Status(self))
        }
    }
}

/// Why a remote call did not produce a successful response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportFailure {
    /// The request did not complete within its deadline.
    #[error("{0}")]
    Timeout(String),

    /// The connection could not be established.
    #[error("{0}")]
    Connect(String),

    /// A transport error without any response object.
    #[error("{0}")]
    Other(String),

    /// The server answered with a non-success status.
    #[error("HTTP status {}", .0.status())]
    Status(RawResponse),
}

impl TransportFailure {
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            TransportFailure::Status(resp) => Some(resp),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportFailure::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportFailure::Connect(e.to_string())
        } else {
            TransportFailure::Other(e.to_string())
        }
    }
}
