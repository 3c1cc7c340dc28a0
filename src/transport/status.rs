use serde::Deserialize;

use crate::domain::{MessageStatus, QuotaResponse, StatusResponse};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum TransportStatus {
    Delivered,
    Sent,
    Sending,
    Failed,
    #[serde(other)]
    Unknown,
}

impl From<TransportStatus> for MessageStatus {
    fn from(value: TransportStatus) -> Self {
        match value {
            TransportStatus::Delivered => MessageStatus::Delivered,
            TransportStatus::Sent => MessageStatus::Sent,
            TransportStatus::Sending => MessageStatus::Sending,
            TransportStatus::Failed => MessageStatus::Failed,
            TransportStatus::Unknown => MessageStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct StatusJsonResponse {
    #[serde(default = "unknown_status")]
    status: TransportStatus,
}

fn unknown_status() -> TransportStatus {
    TransportStatus::Unknown
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuotaJsonResponse {
    success: bool,
    #[serde(default)]
    quota_remaining: u64,
}

pub fn decode_status_json_response(json: &str) -> Result<StatusResponse, TransportError> {
    let parsed: StatusJsonResponse = serde_json::from_str(json)?;
    Ok(StatusResponse {
        status: parsed.status.into(),
    })
}

pub fn decode_quota_json_response(json: &str) -> Result<QuotaResponse, TransportError> {
    let parsed: QuotaJsonResponse = serde_json::from_str(json)?;
    Ok(QuotaResponse {
        success: parsed.success,
        quota_remaining: parsed.quota_remaining,
    })
}
