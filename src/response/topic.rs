//! Topic subscription results.

/// One failed token of a topic subscription request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicError {
    /// Position of the token in the submitted list.
    pub index: usize,
    /// Provider reason, e.g. `NOT_FOUND` or `INVALID_ARGUMENT`.
    pub reason: String,
}

/// Aggregate result of subscribing or unsubscribing a list of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicManagementResponse {
    success_count: usize,
    failure_count: usize,
    errors: Vec<TopicError>,
}

impl TopicManagementResponse {
    pub fn new(success_count: usize, errors: Vec<TopicError>) -> Self {
        Self {
            success_count,
            failure_count: errors.len(),
            errors,
        }
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Failures in result order.
    pub fn errors(&self) -> &[TopicError] {
        &self.errors
    }
}
