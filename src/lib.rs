//! Typed Rust client for the Textbelt SMS HTTP API.
//!
//! The crate is layered: a domain layer of strong types, a transport layer for the wire
//! format, and a client layer orchestrating requests. On top of single sends it offers
//! batched bulk sending ([`bulk`]), one-time passwords, and reply-webhook verification
//! ([`webhook`]).
//!
//! ```rust,no_run
//! use textbelt::{ApiKey, BulkRequest, E164Phone, MessageText, SendText, TextbeltClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TextbeltClient::new(ApiKey::new("...")?);
//!
//!     let phone = E164Phone::new("+12025550108")?;
//!     let request = SendText::new(phone, MessageText::new("hello")?);
//!     let _resp = client.send_text(&request).await?;
//!
//!     let report = client
//!         .send_bulk(&BulkRequest::shared(["+12025550108", "+12025550109"], "hello all"))
//!         .await?;
//!     println!("{} of {} sent", report.successful_messages(), report.total_messages());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod blocking;
pub mod bulk;
pub mod client;
pub mod config;
pub mod domain;
mod transport;
pub mod webhook;

pub use bulk::{BulkReport, BulkRequest, BulkSendError, RecipientOutcome};
pub use client::{TextbeltClient, TextbeltClientBuilder, TextbeltError};
pub use domain::{
    ApiKey, E164Phone, GenerateOtp, GenerateOtpResponse, MessageStatus, MessageText, OtpCode,
    OtpLength, OtpLifetime, PhoneNumber, QuotaResponse, ReplyWebhook, SendOptions, SendText,
    SendTextResponse, SenderName, StatusResponse, TextId, UserId, ValidationError, VerifyOtp,
    VerifyOtpResponse, WebhookData, WebhookUrl,
};
pub use webhook::{WebhookVerificationError, verify_webhook};
