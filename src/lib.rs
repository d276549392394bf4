//! # async-fcm
//!
//! 异步 Firebase Cloud Messaging (FCM HTTP v1) 客户端，提供类型化错误与批量响应解码。
//!
//! Asynchronous Firebase Cloud Messaging client with a typed error taxonomy and a
//! `multipart/mixed` batch response decoder.
//!
//! ## Overview
//!
//! Messages are delivered one at a time ([`FcmClient::send`]), concurrently
//! ([`FcmClient::send_each`]) or as one multipart batch request
//! ([`FcmClient::send_batch`]). Whatever the path, each message resolves to a
//! [`SendResponse`]: a message id, or an [`FcmError`] whose [`FcmErrorCode`] callers can
//! branch on (retry on `UNAVAILABLE`, drop the token on `UNREGISTERED`, ...).
//!
//! Only broken contracts are raised as [`Error`]: invalid input, credential failures,
//! and provider responses that do not follow the documented wire format.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use async_fcm::{FcmClientBuilder, Message, Notification};
//!
//! #[tokio::main]
//! async fn main() -> async_fcm::Result<()> {
//!     let client = FcmClientBuilder::new()
//!         .with_project_id("my-project")
//!         .with_access_token("ya29.token")
//!         .build()?;
//!
//!     let message = Message::to_token("device-token")
//!         .with_notification(Notification::new("Hello", "World"));
//!
//!     let outcome = client.send(&message, false).await?;
//!     match outcome.error() {
//!         None => println!("sent {}", outcome.message_id().unwrap_or_default()),
//!         Some(err) => println!("failed: {} ({})", err, err.kind()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error_code`] | Closed error taxonomy with refined kinds |
//! | [`response`] | Error classification and response decoding |
//! | [`multipart`] | Batch request encoder and response parser |
//! | [`messages`] | Message payload model and platform builders |
//! | [`client`] | Client implementation and builder |
//! | [`auth`] | Token provider trait and service account info |
//! | [`config`] | Client configuration with env overrides |

pub mod auth;
pub mod client;
pub mod config;
pub mod error_code;
pub mod messages;
pub mod multipart;
pub mod response;
pub mod transport;
pub mod utils;

// Re-export main types for convenience
pub use auth::{ServiceAccountInfo, StaticTokenProvider, TokenProvider};
pub use client::{FcmClient, FcmClientBuilder};
pub use config::ClientConfig;
pub use error_code::FcmErrorCode;
pub use messages::{
    AndroidConfig, ApnsConfig, Message, MulticastMessage, Notification, WebpushConfig,
};
pub use response::{
    BatchResponse, FcmError, ProviderCodeTable, RawResponse, ResponseDecoder, SendResponse,
    TopicError, TopicManagementResponse, TransportFailure,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
