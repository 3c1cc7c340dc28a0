//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{GenerateOtp, SendOptions, SendText, VerifyOtp};
pub use response::{
    GenerateOtpResponse, MessageStatus, QuotaResponse, ReplyWebhook, SendTextResponse,
    StatusResponse, VerifyOtpResponse,
};
pub use validation::ValidationError;
pub use value::{
    ApiKey, E164Phone, MessageText, OtpCode, OtpLength, OtpLifetime, PhoneNumber, SenderName,
    TextId, UserId, WebhookData, WebhookUrl, is_e164,
};
