use crate::domain::value::TextId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTextResponse {
    pub success: bool,
    pub quota_remaining: u64,
    pub text_id: Option<TextId>,
    pub error: Option<String>,
}

/// Delivery status reported by `/status/{textId}`.
///
/// Carriers do not report delivery uniformly: some mark a message delivered when the
/// handset is attempted, others only after a receipt, and some never leave `Sent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    /// Carrier has confirmed sending.
    Delivered,
    /// Sent to carrier but no confirmation receipt is available.
    Sent,
    /// Queued or dispatched to the carrier.
    Sending,
    /// Not received.
    Failed,
    /// Status could not be determined.
    Unknown,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivered => "DELIVERED",
            Self::Sent => "SENT",
            Self::Sending => "SENDING",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether the status can still change.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: MessageStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaResponse {
    pub success: bool,
    pub quota_remaining: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOtpResponse {
    pub success: bool,
    pub quota_remaining: u64,
    pub text_id: Option<TextId>,
    /// Generated code; Textbelt only echoes it back for test-mode keys.
    pub otp: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub is_valid_otp: bool,
}

/// Inbound reply delivered to a message's `replyWebhookUrl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyWebhook {
    /// Id of the outbound message being replied to.
    pub text_id: TextId,
    /// Number the reply came from, as reported by the carrier.
    pub from_number: String,
    pub text: String,
    /// The `webhookData` attached to the outbound message, if any.
    pub data: Option<String>,
}
