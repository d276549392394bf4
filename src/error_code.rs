//! FCM 错误码：封闭的错误分类集合，包括细化类型。
//!
//! Canonical FCM error codes.
//!
//! The messaging service reports failures with the canonical Google API status codes
//! (see <https://cloud.google.com/apis/design/errors#handling_errors>). On top of those,
//! FCM attaches a provider-specific `errorCode` to some failures; the refined variants
//! below carry that extra signal while still answering to their base wire code.
//!
//! | Refined kind        | Base kind            |
//! |---------------------|----------------------|
//! | `ThirdPartyAuth`    | `Unauthenticated`    |
//! | `QuotaExceeded`     | `ResourceExhausted`  |
//! | `SenderIdMismatch`  | `PermissionDenied`   |
//! | `Unregistered`      | `NotFound`           |
//!
//! ## Example
//!
//! ```rust
//! use async_fcm::error_code::FcmErrorCode;
//!
//! let code = FcmErrorCode::Unregistered;
//! assert_eq!(code.code(), "NOT_FOUND");
//! assert_eq!(code.name(), "UNREGISTERED");
//! assert_eq!(code.base(), FcmErrorCode::NotFound);
//! assert_eq!(FcmErrorCode::from_http_status(503), FcmErrorCode::Unavailable);
//! ```

use std::fmt;

/// A member of the closed FCM error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FcmErrorCode {
    /// Client specified an invalid argument.
    InvalidArgument,
    /// Request can not be executed in the current system state.
    FailedPrecondition,
    /// Client specified an invalid range.
    OutOfRange,
    /// Missing, invalid, or expired OAuth token.
    Unauthenticated,
    /// Client does not have sufficient permission.
    PermissionDenied,
    /// A specified resource is not found.
    NotFound,
    /// Concurrency conflict, such as read-modify-write conflict.
    Conflict,
    /// The operation was aborted, typically by a concurrency issue.
    Aborted,
    /// The resource that a client tried to create already exists.
    AlreadyExists,
    /// Either out of resource quota or reaching rate limiting.
    ResourceExhausted,
    /// Request cancelled by the client.
    Cancelled,
    /// Unrecoverable data loss or data corruption.
    DataLoss,
    /// Unknown server error.
    Unknown,
    /// Internal server error.
    Internal,
    /// Service unavailable. Typically the server is down.
    Unavailable,
    /// Request deadline exceeded.
    DeadlineExceeded,
    /// APNs certificate or web push auth key was invalid or missing.
    ThirdPartyAuth,
    /// Sending limit exceeded for the message target.
    QuotaExceeded,
    /// The authenticated sender ID differs from the sender ID of the registration token.
    SenderIdMismatch,
    /// App instance was unregistered from FCM; the token is no longer valid.
    Unregistered,
}

impl FcmErrorCode {
    /// Every kind in the taxonomy, base kinds first.
    pub const ALL: [FcmErrorCode; 20] = [
        Self::InvalidArgument,
        Self::FailedPrecondition,
        Self::OutOfRange,
        Self::Unauthenticated,
        Self::PermissionDenied,
        Self::NotFound,
        Self::Conflict,
        Self::Aborted,
        Self::AlreadyExists,
        Self::ResourceExhausted,
        Self::Cancelled,
        Self::DataLoss,
        Self::Unknown,
        Self::Internal,
        Self::Unavailable,
        Self::DeadlineExceeded,
        Self::ThirdPartyAuth,
        Self::QuotaExceeded,
        Self::SenderIdMismatch,
        Self::Unregistered,
    ];

    /// Returns the wire status code (e.g. `"NOT_FOUND"`).
    ///
    /// Refined kinds report the code of their base kind.
    #[inline]
    pub fn code(&self) -> &'static str {
        self.base().name()
    }

    /// Returns the distinct name of this kind (e.g. `"UNREGISTERED"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Aborted => "ABORTED",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::Cancelled => "CANCELLED",
            Self::DataLoss => "DATA_LOSS",
            Self::Unknown => "UNKNOWN",
            Self::Internal => "INTERNAL",
            Self::Unavailable => "UNAVAILABLE",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::ThirdPartyAuth => "THIRD_PARTY_AUTH",
            Self::QuotaExceeded => "QUOTA_EXCEEDED",
            Self::SenderIdMismatch => "SENDER_ID_MISMATCH",
            Self::Unregistered => "UNREGISTERED",
        }
    }

    /// Returns the base kind this kind refines, or itself for base kinds.
    #[inline]
    pub fn base(&self) -> Self {
        match self {
            Self::ThirdPartyAuth => Self::Unauthenticated,
            Self::QuotaExceeded => Self::ResourceExhausted,
            Self::SenderIdMismatch => Self::PermissionDenied,
            Self::Unregistered => Self::NotFound,
            other => *other,
        }
    }

    #[inline]
    pub fn is_refined(&self) -> bool {
        self.base() != *self
    }

    /// Returns true when `self` is `other` or refines it.
    pub fn is_a(&self, other: FcmErrorCode) -> bool {
        *self == other || self.base() == other
    }

    /// Whether a caller may reasonably retry the same request later.
    #[inline]
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable
                | Self::DeadlineExceeded
                | Self::Internal
                | Self::Aborted
                | Self::ResourceExhausted
                | Self::QuotaExceeded
        )
    }

    /// Resolves a wire status string (the `error.status` field) to a base kind.
    ///
    /// Unrecognized strings resolve to `Unknown`; refined names are never produced here
    /// because the wire never carries them in `status`.
    pub fn from_status(status: &str) -> Self {
        match status {
            "INVALID_ARGUMENT" => Self::InvalidArgument,
            "FAILED_PRECONDITION" => Self::FailedPrecondition,
            "OUT_OF_RANGE" => Self::OutOfRange,
            "UNAUTHENTICATED" => Self::Unauthenticated,
            "PERMISSION_DENIED" => Self::PermissionDenied,
            "NOT_FOUND" => Self::NotFound,
            "CONFLICT" => Self::Conflict,
            "ABORTED" => Self::Aborted,
            "ALREADY_EXISTS" => Self::AlreadyExists,
            "RESOURCE_EXHAUSTED" => Self::ResourceExhausted,
            "CANCELLED" => Self::Cancelled,
            "DATA_LOSS" => Self::DataLoss,
            "INTERNAL" => Self::Internal,
            "UNAVAILABLE" => Self::Unavailable,
            "DEADLINE_EXCEEDED" => Self::DeadlineExceeded,
            _ => Self::Unknown,
        }
    }

    /// Maps an HTTP status code to a base kind when the body carries no `status`.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidArgument,
            401 => Self::Unauthenticated,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::Conflict,
            412 => Self::FailedPrecondition,
            429 => Self::ResourceExhausted,
            500 => Self::Internal,
            503 => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FcmErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refined_kinds_report_base_wire_code() {
        assert_eq!(FcmErrorCode::ThirdPartyAuth.code(), "UNAUTHENTICATED");
        assert_eq!(FcmErrorCode::QuotaExceeded.code(), "RESOURCE_EXHAUSTED");
        assert_eq!(FcmErrorCode::SenderIdMismatch.code(), "PERMISSION_DENIED");
        assert_eq!(FcmErrorCode::Unregistered.code(), "NOT_FOUND");
        assert!(FcmErrorCode::Unregistered.is_a(FcmErrorCode::NotFound));
        assert!(!FcmErrorCode::NotFound.is_a(FcmErrorCode::Unregistered));
    }

    #[test]
    fn base_kinds_round_trip_through_status_strings() {
        for code in FcmErrorCode::ALL.iter().filter(|c| !c.is_refined()) {
            assert_eq!(FcmErrorCode::from_status(code.code()), *code);
        }
        assert_eq!(FcmErrorCode::from_status("TEAPOT"), FcmErrorCode::Unknown);
        assert_eq!(FcmErrorCode::from_status("UNREGISTERED"), FcmErrorCode::Unknown);
    }

    #[test]
    fn http_status_table() {
        let table = [
            (400, FcmErrorCode::InvalidArgument),
            (401, FcmErrorCode::Unauthenticated),
            (403, FcmErrorCode::PermissionDenied),
            (404, FcmErrorCode::NotFound),
            (409, FcmErrorCode::Conflict),
            (412, FcmErrorCode::FailedPrecondition),
            (429, FcmErrorCode::ResourceExhausted),
            (500, FcmErrorCode::Internal),
            (503, FcmErrorCode::Unavailable),
        ];
        for (status, expected) in table {
            assert_eq!(FcmErrorCode::from_http_status(status), expected);
        }
        for status in [200, 302, 402, 418, 502, 504] {
            assert_eq!(FcmErrorCode::from_http_status(status), FcmErrorCode::Unknown);
        }
    }
}
