use std::time::Duration;

use serde::Deserialize;

use crate::domain::{
    ApiKey, E164Phone, MessageText, SendText, SendTextResponse, SenderName, TextId, WebhookData,
    WebhookUrl,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains an empty textId")]
    EmptyTextId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendTextJsonResponse {
    success: bool,
    #[serde(default)]
    quota_remaining: Option<u64>,
    #[serde(default)]
    text_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitJsonBody {
    #[serde(default)]
    retry_after: Option<f64>,
}

/// Reply to a call that consumes quota, split on the `success` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    Accepted(T),
    /// `success: false`. `quota_remaining` is `None` when the body omitted it.
    Refused {
        error: Option<String>,
        quota_remaining: Option<u64>,
    },
}

pub fn encode_send_text_form(request: &SendText, key: &ApiKey) -> Vec<(String, String)> {
    let mut params = vec![
        (E164Phone::FIELD.to_owned(), request.phone().as_str().to_owned()),
        (
            MessageText::FIELD.to_owned(),
            request.message().as_str().to_owned(),
        ),
        (ApiKey::FIELD.to_owned(), key.as_str().to_owned()),
    ];

    let options = request.options();
    if let Some(sender) = options.sender.as_ref() {
        params.push((SenderName::FIELD.to_owned(), sender.as_str().to_owned()));
    }
    if let Some(url) = options.reply_webhook_url.as_ref() {
        params.push((WebhookUrl::FIELD.to_owned(), url.as_str().to_owned()));
    }
    if let Some(data) = options.webhook_data.as_ref() {
        params.push((WebhookData::FIELD.to_owned(), data.as_str().to_owned()));
    }

    params
}

pub fn decode_send_text_json_response(
    json: &str,
) -> Result<Reply<SendTextResponse>, TransportError> {
    let parsed: SendTextJsonResponse = serde_json::from_str(json)?;
    if !parsed.success {
        return Ok(Reply::Refused {
            error: parsed.error,
            quota_remaining: parsed.quota_remaining,
        });
    }
    Ok(Reply::Accepted(SendTextResponse {
        success: true,
        quota_remaining: parsed.quota_remaining.unwrap_or_default(),
        text_id: decode_text_id(parsed.text_id)?,
        error: parsed.error,
    }))
}

pub(crate) fn decode_text_id(value: Option<String>) -> Result<Option<TextId>, TransportError> {
    value
        .map(|raw| TextId::new(raw).map_err(|_| TransportError::EmptyTextId))
        .transpose()
}

/// Extract `retryAfter` (seconds, possibly fractional) from a 429 body.
///
/// Missing, malformed, negative or non-finite values yield `None`.
pub fn decode_retry_after(json: &str) -> Option<Duration> {
    serde_json::from_str::<RateLimitJsonBody>(json)
        .ok()
        .and_then(|body| body.retry_after)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}
