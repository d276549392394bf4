//! Typed per-message error.

use super::raw::RawResponse;
use crate::error_code::FcmErrorCode;
use std::fmt;
use std::sync::Arc;

type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// A classified delivery failure.
///
/// `kind` is always a member of [`FcmErrorCode`]; `message` is never empty.
#[derive(Clone)]
pub struct FcmError {
    kind: FcmErrorCode,
    message: String,
    cause: Option<Cause>,
    http_response: Option<RawResponse>,
}

impl FcmError {
    pub fn new(kind: FcmErrorCode, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = format!("FCM request failed with {}", kind.name());
        }
        Self {
            kind,
            message,
            cause: None,
            http_response: None,
        }
    }

    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn with_http_response(mut self, response: RawResponse) -> Self {
        self.http_response = Some(response);
        self
    }

    pub fn kind(&self) -> FcmErrorCode {
        self.kind
    }

    /// The wire code; refined kinds answer with their base code.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn http_response(&self) -> Option<&RawResponse> {
        self.http_response.as_ref()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.retryable()
    }
}

impl fmt::Debug for FcmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FcmError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .field("http_status", &self.http_response.as_ref().map(|r| r.status()))
            .finish()
    }
}

impl fmt::Display for FcmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for FcmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

// Causes are opaque, so they compare by rendering.
impl PartialEq for FcmError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.message == other.message
            && self.http_response == other.http_response
            && self.cause.as_ref().map(|c| c.to_string())
                == other.cause.as_ref().map(|c| c.to_string())
    }
}
