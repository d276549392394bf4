//! Message payloads (消息载荷).
//!
//! Typed FCM v1 message model plus builders for the platform-specific blocks.
//! [`assemble_push_notification`] turns a [`Message`] into the compacted JSON body
//! of a `messages:send` request.

pub mod android;
pub mod apns;
pub mod message;
pub mod webpush;

pub use android::{AndroidConfig, AndroidConfigBuilder, AndroidNotification, AndroidPriority};
pub use apns::{Alert, ApnsConfig, ApnsConfigBuilder, ApnsFcmOptions, ApnsPayload, ApnsPriority, Aps, ApsAlert};
pub use message::{FcmOptions, Message, MulticastMessage, Notification, PushNotification};
pub use webpush::{
    Direction, WebpushConfig, WebpushConfigBuilder, WebpushFcmOptions, WebpushNotification,
    WebpushNotificationAction,
};

use crate::error::ErrorContext;
use crate::{Error, Result};
use serde_json::Value;
use tracing::warn;

/// Recursively drop `null`, `{}` and `[]` values from objects.
///
/// Falsy scalars (`""`, `0`, `false`) are kept. Array elements are compacted but
/// never removed.
pub fn compact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, compact(v)))
                .filter(|(_, v)| !is_vacant(v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(compact).collect()),
        scalar => scalar,
    }
}

fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Build the `messages:send` request body for `message`.
///
/// Fails with a validation error when the message is not addressed to exactly one
/// target or carries nothing besides its target.
pub fn assemble_push_notification(message: &Message, dry_run: bool) -> Result<Value> {
    let targets = message.target_count();
    if targets != 1 {
        return Err(Error::validation_with_context(
            "Exactly one of token, topic or condition must be set",
            ErrorContext::new()
                .with_field_path("message")
                .with_details(format!("{} targets set", targets)),
        ));
    }

    let body = compact(serde_json::to_value(PushNotification {
        message,
        validate_only: dry_run,
    })?);

    let fields = body
        .get("message")
        .and_then(Value::as_object)
        .map(|m| m.len())
        .unwrap_or(0);
    if fields <= 1 {
        warn!("no data has been provided to construct push notification payload");
        return Err(Error::validation_with_context(
            "Push notification cannot be assembled as data has not been provided",
            ErrorContext::new().with_field_path("message"),
        ));
    }
    Ok(body)
}
