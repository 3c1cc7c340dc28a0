//! Verification and decoding of inbound reply webhooks.
//!
//! Textbelt signs each reply webhook with HMAC-SHA256 over `timestamp + payload`, keyed by
//! the API key that sent the original message, and sends the hex digest together with the
//! timestamp in the [`TIMESTAMP_HEADER`] and [`SIGNATURE_HEADER`] headers.
//!
//! ```rust
//! use textbelt::ApiKey;
//! use textbelt::webhook::verify_webhook;
//!
//! let key = ApiKey::new("my-key").unwrap();
//! // A timestamp that does not parse is rejected before the signature is checked.
//! assert!(verify_webhook(&key, "yesterday", "00", "{}").is_err());
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

use crate::domain::{ApiKey, ReplyWebhook};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signing timestamp (Unix seconds).
pub const TIMESTAMP_HEADER: &str = "X-textbelt-timestamp";
/// Header carrying the hex-encoded HMAC-SHA256 signature.
pub const SIGNATURE_HEADER: &str = "X-textbelt-signature";
/// Maximum distance between the signing timestamp and the local clock, in either direction.
pub const FRESHNESS_WINDOW: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, thiserror::Error)]
pub enum WebhookVerificationError {
    #[error("invalid webhook timestamp: {input}")]
    InvalidTimestamp { input: String },

    #[error("webhook timestamp {timestamp} is outside the freshness window")]
    StaleTimestamp { timestamp: u64 },

    #[error("webhook signature does not match")]
    SignatureMismatch,

    #[error("API key cannot be used as an HMAC key")]
    InvalidKey,

    #[error("invalid webhook payload: {0}")]
    InvalidPayload(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Check a webhook signature against the local clock.
///
/// Returns `Ok(false)` when the signature does not match (including signatures that are
/// not valid hex), and an error when the timestamp is unparseable or outside
/// [`FRESHNESS_WINDOW`].
pub fn verify_webhook(
    api_key: &ApiKey,
    timestamp: &str,
    signature: &str,
    payload: &str,
) -> Result<bool, WebhookVerificationError> {
    verify_webhook_at(api_key, timestamp, signature, payload, SystemTime::now())
}

/// Like [`verify_webhook`], with an explicit current time.
pub fn verify_webhook_at(
    api_key: &ApiKey,
    timestamp: &str,
    signature: &str,
    payload: &str,
    now: SystemTime,
) -> Result<bool, WebhookVerificationError> {
    let signed_at = timestamp.trim().parse::<u64>().map_err(|_| {
        WebhookVerificationError::InvalidTimestamp {
            input: timestamp.to_owned(),
        }
    })?;

    let now_secs = now
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    if now_secs.abs_diff(signed_at) > FRESHNESS_WINDOW.as_secs() {
        warn!(timestamp = signed_at, now = now_secs, "rejecting stale webhook");
        return Err(WebhookVerificationError::StaleTimestamp {
            timestamp: signed_at,
        });
    }

    let Ok(expected) = hex::decode(signature.trim()) else {
        return Ok(false);
    };

    let mut mac = HmacSha256::new_from_slice(api_key.as_str().as_bytes())
        .map_err(|_| WebhookVerificationError::InvalidKey)?;
    mac.update(timestamp.as_bytes());
    mac.update(payload.as_bytes());
    Ok(mac.verify_slice(&expected).is_ok())
}

/// Verify a webhook and decode its JSON body.
pub fn parse_verified_webhook(
    api_key: &ApiKey,
    timestamp: &str,
    signature: &str,
    payload: &str,
) -> Result<ReplyWebhook, WebhookVerificationError> {
    if !verify_webhook(api_key, timestamp, signature, payload)? {
        return Err(WebhookVerificationError::SignatureMismatch);
    }
    crate::transport::decode_reply_webhook_json(payload)
        .map_err(|err| WebhookVerificationError::InvalidPayload(Box::new(err)))
}
