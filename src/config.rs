//! Client configuration with environment overrides.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `FCM_BASE_URL` | `https://fcm.googleapis.com` |
//! | `FCM_IID_URL` | `https://iid.googleapis.com` |
//! | `FCM_HTTP_TIMEOUT_SECS` | `5` |
//! | `FCM_HTTP_POOL_MAX_IDLE_PER_HOST` | `20` |
//! | `FCM_HTTP_POOL_IDLE_TIMEOUT_SECS` | `5` |
//! | `FCM_HTTP2` | `false` |
//! | `FCM_SEND_CONCURRENCY` | `100` |

use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://fcm.googleapis.com";
pub const DEFAULT_IID_URL: &str = "https://iid.googleapis.com";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub iid_url: String,
    pub timeout: Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: Duration,
    pub http2: bool,
    /// Upper bound on in-flight requests for `send_each`.
    pub send_concurrency: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            iid_url: DEFAULT_IID_URL.to_string(),
            timeout: Duration::from_secs(5),
            pool_max_idle_per_host: 20,
            pool_idle_timeout: Duration::from_secs(5),
            http2: false,
            send_concurrency: 100,
        }
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Option<T> {
    env::var(var).ok().and_then(|s| s.trim().parse::<T>().ok())
}

fn env_flag(var: &str) -> Option<bool> {
    env::var(var)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl ClientConfig {
    /// Defaults overridden by `FCM_*` environment variables. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    pub fn merge_env(mut self) -> Self {
        if let Ok(url) = env::var("FCM_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(url) = env::var("FCM_IID_URL") {
            self.iid_url = url;
        }
        if let Some(secs) = env_parse::<u64>("FCM_HTTP_TIMEOUT_SECS") {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = env_parse::<usize>("FCM_HTTP_POOL_MAX_IDLE_PER_HOST") {
            self.pool_max_idle_per_host = n;
        }
        if let Some(secs) = env_parse::<u64>("FCM_HTTP_POOL_IDLE_TIMEOUT_SECS") {
            self.pool_idle_timeout = Duration::from_secs(secs);
        }
        if let Some(enabled) = env_flag("FCM_HTTP2") {
            self.http2 = enabled;
        }
        if let Some(n) = env_parse::<usize>("FCM_SEND_CONCURRENCY") {
            self.send_concurrency = n.max(1);
        }
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_iid_url(mut self, url: impl Into<String>) -> Self {
        self.iid_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_http2(mut self, enabled: bool) -> Self {
        self.http2 = enabled;
        self
    }

    pub fn with_send_concurrency(mut self, n: usize) -> Self {
        self.send_concurrency = n.max(1);
        self
    }
}
