//! Message envelope types.

use super::{AndroidConfig, ApnsConfig, WebpushConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Basic notification shared by every platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
            image: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FcmOptions {
    pub analytics_label: Option<String>,
}

/// One message addressed to exactly one of a device token, a topic or a condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub token: Option<String>,
    pub topic: Option<String>,
    pub condition: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    pub notification: Option<Notification>,
    pub android: Option<AndroidConfig>,
    pub apns: Option<ApnsConfig>,
    pub webpush: Option<WebpushConfig>,
    pub fcm_options: Option<FcmOptions>,
}

impl Message {
    pub fn to_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn to_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..Self::default()
        }
    }

    /// Target a topic condition such as `'news' in topics && 'sport' in topics`.
    pub fn to_condition(condition: impl Into<String>) -> Self {
        Self {
            condition: Some(condition.into()),
            ..Self::default()
        }
    }

    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_android(mut self, android: AndroidConfig) -> Self {
        self.android = Some(android);
        self
    }

    pub fn with_apns(mut self, apns: ApnsConfig) -> Self {
        self.apns = Some(apns);
        self
    }

    pub fn with_webpush(mut self, webpush: WebpushConfig) -> Self {
        self.webpush = Some(webpush);
        self
    }

    pub fn with_analytics_label(mut self, label: impl Into<String>) -> Self {
        self.fcm_options = Some(FcmOptions {
            analytics_label: Some(label.into()),
        });
        self
    }

    /// Number of addressing fields set (token, topic, condition).
    pub(crate) fn target_count(&self) -> usize {
        [&self.token, &self.topic, &self.condition]
            .iter()
            .filter(|t| t.as_deref().map_or(false, |s| !s.is_empty()))
            .count()
    }
}

/// The same payload fanned out to many device tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MulticastMessage {
    pub tokens: Vec<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    pub notification: Option<Notification>,
    pub android: Option<AndroidConfig>,
    pub apns: Option<ApnsConfig>,
    pub webpush: Option<WebpushConfig>,
    pub fcm_options: Option<FcmOptions>,
}

impl MulticastMessage {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            ..Self::default()
        }
    }

    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_android(mut self, android: AndroidConfig) -> Self {
        self.android = Some(android);
        self
    }

    pub fn with_apns(mut self, apns: ApnsConfig) -> Self {
        self.apns = Some(apns);
        self
    }

    pub fn with_webpush(mut self, webpush: WebpushConfig) -> Self {
        self.webpush = Some(webpush);
        self
    }

    /// One [`Message`] per token, in token order.
    pub fn to_messages(&self) -> Vec<Message> {
        self.tokens
            .iter()
            .map(|token| Message {
                token: Some(token.clone()),
                topic: None,
                condition: None,
                data: self.data.clone(),
                notification: self.notification.clone(),
                android: self.android.clone(),
                apns: self.apns.clone(),
                webpush: self.webpush.clone(),
                fcm_options: self.fcm_options.clone(),
            })
            .collect()
    }
}

/// Request body of `messages:send`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushNotification<'a> {
    pub message: &'a Message,
    pub validate_only: bool,
}
