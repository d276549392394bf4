//! Android-specific message options.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AndroidPriority {
    Normal,
    High,
}

/// Notification options shown by the Android system tray.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AndroidNotification {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    /// `#rrggbb` icon color.
    pub color: Option<String>,
    pub sound: Option<String>,
    /// Notifications with the same tag replace each other in the drawer.
    pub tag: Option<String>,
    pub click_action: Option<String>,
    pub body_loc_key: Option<String>,
    #[serde(default)]
    pub body_loc_args: Vec<String>,
    pub title_loc_key: Option<String>,
    #[serde(default)]
    pub title_loc_args: Vec<String>,
    pub channel_id: Option<String>,
    pub image: Option<String>,
    pub notification_count: Option<u32>,
}

impl AndroidNotification {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AndroidConfig {
    pub collapse_key: Option<String>,
    pub priority: Option<AndroidPriority>,
    /// Time to live in the `"<seconds>s"` duration format.
    pub ttl: Option<String>,
    pub restricted_package_name: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    pub notification: Option<AndroidNotification>,
}

impl AndroidConfig {
    pub fn builder() -> AndroidConfigBuilder {
        AndroidConfigBuilder::default()
    }
}

/// Render a data value as the string FCM expects. JSON `null` becomes `"null"`.
pub(crate) fn stringify_data_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds an [`AndroidConfig`] from loose inputs.
#[derive(Debug, Clone, Default)]
pub struct AndroidConfigBuilder {
    config: AndroidConfig,
    notification: AndroidNotification,
}

impl AndroidConfigBuilder {
    pub fn priority(mut self, priority: AndroidPriority) -> Self {
        self.config.priority = Some(priority);
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.config.ttl = Some(format!("{}s", ttl.as_secs()));
        self
    }

    pub fn collapse_key(mut self, key: impl Into<String>) -> Self {
        self.config.collapse_key = Some(key.into());
        self
    }

    pub fn restricted_package_name(mut self, name: impl Into<String>) -> Self {
        self.config.restricted_package_name = Some(name.into());
        self
    }

    /// Add a data entry. Non-string values are stringified.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config
            .data
            .insert(key.into(), stringify_data_value(&value.into()));
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

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.notification.color = Some(color.into());
        self
    }

    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.notification.sound = Some(sound.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.notification.tag = Some(tag.into());
        self
    }

    pub fn click_action(mut self, action: impl Into<String>) -> Self {
        self.notification.click_action = Some(action.into());
        self
    }

    pub fn title_localization(mut self, key: impl Into<String>, args: Vec<String>) -> Self {
        self.notification.title_loc_key = Some(key.into());
        self.notification.title_loc_args = args;
        self
    }

    pub fn body_localization(mut self, key: impl Into<String>, args: Vec<String>) -> Self {
        self.notification.body_loc_key = Some(key.into());
        self.notification.body_loc_args = args;
        self
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.notification.channel_id = Some(channel_id.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.notification.image = Some(image.into());
        self
    }

    pub fn notification_count(mut self, count: u32) -> Self {
        self.notification.notification_count = Some(count);
        self
    }

    pub fn build(self) -> AndroidConfig {
        let mut config = self.config;
        if !self.notification.is_empty() {
            config.notification = Some(self.notification);
        }
        config
    }
}
