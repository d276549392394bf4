//! APNs (iOS) message options.
//!
//! The payload serializes to the dictionary APNs expects:
//! `{"aps": {"alert": ..., "badge": 1, "content-available": 1}, "custom_key": ...}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

pub const HEADER_PRIORITY: &str = "apns-priority";
pub const HEADER_EXPIRATION: &str = "apns-expiration";
pub const HEADER_TOPIC: &str = "apns-topic";
pub const HEADER_COLLAPSE_ID: &str = "apns-collapse-id";

const DEFAULT_SOUND: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApnsPriority {
    /// Deliver immediately (`10`).
    High,
    /// Deliver at a time that conserves power (`5`).
    Normal,
}

impl ApnsPriority {
    pub fn header_value(self) -> &'static str {
        match self {
            ApnsPriority::High => "10",
            ApnsPriority::Normal => "5",
        }
    }
}

// APNs flags are always sent, as `1` or `0`.
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Int(u8),
            Bool(bool),
        }
        Ok(match Flag::deserialize(d)? {
            Flag::Int(n) => n != 0,
            Flag::Bool(b) => b,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApsAlert {
    pub title: Option<String>,
    pub body: Option<String>,
    pub loc_key: Option<String>,
    #[serde(default)]
    pub loc_args: Vec<String>,
    pub title_loc_key: Option<String>,
    #[serde(default)]
    pub title_loc_args: Vec<String>,
    pub action_loc_key: Option<String>,
    pub launch_image: Option<String>,
}

/// `aps.alert` is either a plain string or a structured alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Alert {
    Text(String),
    Fields(ApsAlert),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Aps {
    pub alert: Option<Alert>,
    pub badge: Option<u32>,
    pub sound: Option<String>,
    #[serde(default, with = "flag")]
    pub content_available: bool,
    pub category: Option<String>,
    pub thread_id: Option<String>,
    #[serde(default, with = "flag")]
    pub mutable_content: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApnsPayload {
    pub aps: Aps,
    /// Extra top-level keys delivered next to `aps`.
    #[serde(flatten)]
    pub custom_data: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApnsFcmOptions {
    pub analytics_label: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApnsConfig {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub payload: Option<ApnsPayload>,
    pub fcm_options: Option<ApnsFcmOptions>,
}

impl ApnsConfig {
    pub fn builder() -> ApnsConfigBuilder {
        ApnsConfigBuilder::default()
    }
}

#[derive(Debug, Clone)]
pub struct ApnsConfigBuilder {
    headers: BTreeMap<String, String>,
    alert: Option<String>,
    title: Option<String>,
    aps: Aps,
    custom_data: Map<String, Value>,
    fcm_options: Option<ApnsFcmOptions>,
}

impl Default for ApnsConfigBuilder {
    fn default() -> Self {
        Self {
            headers: BTreeMap::new(),
            alert: None,
            title: None,
            aps: Aps {
                sound: Some(DEFAULT_SOUND.to_string()),
                mutable_content: true,
                ..Aps::default()
            },
            custom_data: Map::new(),
            fcm_options: None,
        }
    }
}

impl ApnsConfigBuilder {
    pub fn priority(mut self, priority: ApnsPriority) -> Self {
        self.headers
            .insert(HEADER_PRIORITY.to_string(), priority.header_value().to_string());
        self
    }

    /// Expire the notification `ttl` from now (UNIX seconds in `apns-expiration`).
    pub fn ttl(mut self, ttl: Duration) -> Self {
        let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires_at = chrono::Utc::now().timestamp().saturating_add(secs);
        self.headers
            .insert(HEADER_EXPIRATION.to_string(), expires_at.to_string());
        self
    }

    pub fn apns_topic(mut self, topic: impl Into<String>) -> Self {
        self.headers.insert(HEADER_TOPIC.to_string(), topic.into());
        self
    }

    pub fn collapse_key(mut self, key: impl Into<String>) -> Self {
        self.headers.insert(HEADER_COLLAPSE_ID.to_string(), key.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Alert text. Becomes the alert body when a title is also set.
    pub fn alert(mut self, alert: impl Into<String>) -> Self {
        self.alert = Some(alert.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn badge(mut self, badge: u32) -> Self {
        self.aps.badge = Some(badge);
        self
    }

    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.aps.sound = Some(sound.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.aps.category = Some(category.into());
        self
    }

    pub fn thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.aps.thread_id = Some(thread_id.into());
        self
    }

    pub fn content_available(mut self, enabled: bool) -> Self {
        self.aps.content_available = enabled;
        self
    }

    pub fn mutable_content(mut self, enabled: bool) -> Self {
        self.aps.mutable_content = enabled;
        self
    }

    pub fn custom_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_data.insert(key.into(), value.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.fcm_options.get_or_insert_with(Default::default).image = Some(image.into());
        self
    }

    pub fn build(self) -> ApnsConfig {
        let mut aps = self.aps;
        aps.alert = match (self.title, self.alert) {
            (Some(title), body) => Some(Alert::Fields(ApsAlert {
                title: Some(title),
                body,
                ..ApsAlert::default()
            })),
            (None, Some(text)) => Some(Alert::Text(text)),
            (None, None) => None,
        };

        ApnsConfig {
            headers: self.headers,
            payload: Some(ApnsPayload {
                aps,
                custom_data: self.custom_data,
            }),
            fcm_options: self.fcm_options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_sets_headers_and_structured_alert() {
        let before = chrono::Utc::now().timestamp();
        let config = ApnsConfig::builder()
            .priority(ApnsPriority::High)
            .ttl(Duration::from_secs(7200))
            .apns_topic("test-topic")
            .collapse_key("something")
            .alert("alert-message")
            .title("some-title")
            .badge(0)
            .build();

        assert_eq!(config.headers[HEADER_PRIORITY], "10");
        assert_eq!(config.headers[HEADER_TOPIC], "test-topic");
        assert_eq!(config.headers[HEADER_COLLAPSE_ID], "something");
        let expires: i64 = config.headers[HEADER_EXPIRATION].parse().unwrap();
        assert!(expires >= before + 7200 && expires <= chrono::Utc::now().timestamp() + 7200);

        let aps = &config.payload.as_ref().unwrap().aps;
        assert_eq!(
            aps.alert,
            Some(Alert::Fields(ApsAlert {
                title: Some("some-title".into()),
                body: Some("alert-message".into()),
                ..ApsAlert::default()
            }))
        );
        assert_eq!(aps.sound.as_deref(), Some("default"));
        assert!(aps.mutable_content);
    }

    #[test]
    fn huge_ttl_saturates_expiration() {
        let config = ApnsConfig::builder().ttl(Duration::from_secs(u64::MAX)).build();
        assert_eq!(config.headers[HEADER_EXPIRATION], i64::MAX.to_string());
    }

    #[test]
    fn payload_serializes_apns_keys() {
        let config = ApnsConfig::builder()
            .priority(ApnsPriority::Normal)
            .alert("hi")
            .badge(1)
            .category("CATEGORY_BUCKET_UPDATED")
            .content_available(true)
            .custom_data("bucket_name", "3bc56ff12a")
            .custom_data("updated_count", 1)
            .build();
        assert_eq!(config.headers[HEADER_PRIORITY], "5");

        let payload = serde_json::to_value(config.payload.unwrap()).unwrap();
        assert_eq!(payload["aps"]["alert"], "hi");
        assert_eq!(payload["aps"]["content-available"], 1);
        assert_eq!(payload["aps"]["mutable-content"], 1);
        assert_eq!(payload["aps"]["category"], "CATEGORY_BUCKET_UPDATED");
        assert_eq!(payload["bucket_name"], "3bc56ff12a");
        assert_eq!(payload["updated_count"], 1);
    }

    #[test]
    fn unset_flags_are_sent_as_zero_and_parse_back() {
        let aps = Aps::default();
        let value = serde_json::to_value(&aps).unwrap();
        assert_eq!(value["content-available"], 0);
        assert_eq!(value["mutable-content"], 0);

        let parsed: Aps = serde_json::from_value(json!({"content-available": 1, "badge": 2})).unwrap();
        assert!(parsed.content_available);
        assert!(!parsed.mutable_content);
        assert_eq!(parsed.badge, Some(2));
    }
}
