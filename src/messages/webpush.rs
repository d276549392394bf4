//! Web Push message options.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Auto,
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebpushNotificationAction {
    pub action: String,
    pub title: String,
    pub icon: Option<String>,
}

/// Web notification options, see the `Notification` interface of the Notifications API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebpushNotification {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "lang")]
    pub language: Option<String>,
    pub tag: Option<String>,
    pub badge: Option<String>,
    #[serde(rename = "dir")]
    pub direction: Option<Direction>,
    pub renotify: Option<bool>,
    #[serde(rename = "requireInteraction")]
    pub require_interaction: Option<bool>,
    pub silent: Option<bool>,
    #[serde(rename = "timestamp")]
    pub timestamp_millis: Option<i64>,
    #[serde(default)]
    pub vibrate: Vec<u32>,
    #[serde(default)]
    pub actions: Vec<WebpushNotificationAction>,
    /// Extra notification fields, merged at the top level.
    #[serde(flatten)]
    pub custom_data: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebpushFcmOptions {
    /// Opened when the user clicks the notification. Must be HTTPS.
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebpushConfig {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    pub notification: Option<WebpushNotification>,
    pub fcm_options: Option<WebpushFcmOptions>,
}

impl WebpushConfig {
    pub fn builder() -> WebpushConfigBuilder {
        WebpushConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WebpushConfigBuilder {
    config: WebpushConfig,
    notification: WebpushNotification,
}

impl WebpushConfigBuilder {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config
            .data
            .insert(key.into(), super::android::stringify_data_value(&value.into()));
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.notification.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.notification.body = Some(body.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.notification.icon = Some(icon.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.notification.image = Some(image.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.notification.language = Some(language.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.notification.tag = Some(tag.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.notification.direction = Some(direction);
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.notification.silent = Some(silent);
        self
    }

    pub fn renotify(mut self, renotify: bool) -> Self {
        self.notification.renotify = Some(renotify);
        self
    }

    pub fn require_interaction(mut self, required: bool) -> Self {
        self.notification.require_interaction = Some(required);
        self
    }

    pub fn action(mut self, action: WebpushNotificationAction) -> Self {
        self.notification.actions.push(action);
        self
    }

    pub fn custom_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.notification.custom_data.insert(key.into(), value.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.config.fcm_options = Some(WebpushFcmOptions {
            link: Some(link.into()),
        });
        self
    }

    pub fn build(self) -> WebpushConfig {
        let mut config = self.config;
        if self.notification != WebpushNotification::default() {
            config.notification = Some(self.notification);
        }
        config
    }
}
