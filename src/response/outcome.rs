//! Per-message outcomes and their batch aggregate.

use super::fcm_error::FcmError;
use crate::error_code::FcmErrorCode;
use crate::Error;

/// The result of one message-send attempt: a delivered message id or a typed error.
#[derive(Debug, Clone, PartialEq)]
pub struct SendResponse {
    message_id: Option<String>,
    error: Option<FcmError>,
    content_id: Option<String>,
}

impl SendResponse {
    pub fn success(message_id: impl Into<String>) -> Self {
        Self {
            message_id: Some(message_id.into()),
            error: None,
            content_id: None,
        }
    }

    pub fn failure(error: FcmError) -> Self {
        Self {
            message_id: None,
            error: Some(error),
            content_id: None,
        }
    }

    /// Attach the multipart correlation id this outcome was decoded from.
    pub fn with_content_id(mut self, content_id: Option<String>) -> Self {
        self.content_id = content_id;
        self
    }

    /// Message resource name, e.g. `projects/p/messages/0:1612788010922733%7606eb24`.
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn error(&self) -> Option<&FcmError> {
        self.error.as_ref()
    }

    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.message_id.is_some() && self.error.is_none()
    }

    pub fn into_result(self) -> Result<String, FcmError> {
        match (self.message_id, self.error) {
            (_, Some(err)) => Err(err),
            (Some(id), None) => Ok(id),
            (None, None) => Err(FcmError::new(
                FcmErrorCode::Unknown,
                "Outcome carried neither a message id nor an error",
            )),
        }
    }
}

/// Ordered outcomes of a batch, index-aligned with the submitted messages.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchResponse {
    responses: Vec<SendResponse>,
    success_count: usize,
}

impl BatchResponse {
    pub fn new(responses: Vec<SendResponse>) -> Self {
        let success_count = responses.iter().filter(|r| r.is_success()).count();
        Self {
            responses,
            success_count,
        }
    }

    /// Aggregate independently executed sends.
    ///
    /// A raised [`Error::Fcm`] becomes that error's failure outcome; any other raised
    /// error is wrapped as an `UNKNOWN` failure so one bad item never loses the others.
    pub fn from_results(results: Vec<crate::Result<SendResponse>>) -> Self {
        let responses = results
            .into_iter()
            .map(|r| match r {
                Ok(resp) => resp,
                Err(Error::Fcm(err)) => SendResponse::failure(err),
                Err(other) => SendResponse::failure(
                    FcmError::new(FcmErrorCode::Unknown, other.to_string()).with_cause(other),
                ),
            })
            .collect();
        Self::new(responses)
    }

    pub fn responses(&self) -> &[SendResponse] {
        &self.responses
    }

    pub fn into_responses(self) -> Vec<SendResponse> {
        self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.responses.len() - self.success_count
    }

    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn success_rate(&self) -> f64 {
        if self.responses.is_empty() {
            0.0
        } else {
            self.success_count as f64 / self.responses.len() as f64
        }
    }

    /// Failed outcomes with their index in the submitted batch.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &FcmError)> + '_ {
        self.responses
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.error().map(|e| (i, e)))
    }
}

impl<'a> IntoIterator for &'a BatchResponse {
    type Item = &'a SendResponse;
    type IntoIter = std::slice::Iter<'a, SendResponse>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.iter()
    }
}
