//! Typed Rust client for sending Feishu/Lark instant messages.
//!
//! The crate has a domain layer of strong types, a transport layer for
//! wire-format details, and a small client layer orchestrating requests. On top
//! sits [`send_text_message`], which sends one text message and logs the outcome.
//!
//! ```rust,no_run
//! use feishu_im::{Config, FeishuClient, ReceiveIdType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = FeishuClient::from_config(&config)?;
//!     let outcome = client
//!         .send_text_message(ReceiveIdType::ChatId, "oc_xxx", "hello")
//!         .await?;
//!     println!("sent: {}", outcome.is_sent());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod sender;
mod transport;

pub use client::{Credentials, FeishuClient, FeishuClientBuilder, FeishuError};
pub use config::{Config, ConfigError};
pub use domain::{
    ApiCode, ApiFailure, AppId, AppSecret, CreateMessage, CreateMessageResponse, KnownApiCode,
    MessageContent, MessageText, ReceiveId, ReceiveIdType, RequestUuid, SendOutcome,
    TenantAccessToken, ValidationError,
};
pub use sender::send_text_message;
