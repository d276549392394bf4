//! FCM client (客户端).
//!
//! Keep the public surface small: build an [`FcmClient`] with [`FcmClientBuilder`], then
//! call `send`, `send_each`, `send_batch` or the topic operations.
//! Implementation details are split into submodules under `src/client/`.

pub mod batch;
pub mod builder;
pub mod core;
pub mod topic;

pub use builder::FcmClientBuilder;
pub use self::core::FcmClient;

/// Most messages accepted by one `send_each` / `send_batch` call.
pub const BATCH_MAX_MESSAGES: usize = 500;

/// Most device tokens accepted by one multicast message.
pub const MULTICAST_MAX_TOKENS: usize = 500;

/// Most device tokens accepted by one topic subscription call.
pub const TOPIC_MAX_TOKENS: usize = 1000;
