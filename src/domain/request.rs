use crate::domain::value::{
    E164Phone, MessageText, OtpCode, OtpLength, OtpLifetime, SenderName, UserId, WebhookData,
    WebhookUrl,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    pub sender: Option<SenderName>,
    pub reply_webhook_url: Option<WebhookUrl>,
    pub webhook_data: Option<WebhookData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendText {
    phone: E164Phone,
    message: MessageText,
    options: SendOptions,
}

impl SendText {
    pub fn new(phone: E164Phone, message: MessageText) -> Self {
        Self {
            phone,
            message,
            options: SendOptions::default(),
        }
    }

    pub fn with_options(phone: E164Phone, message: MessageText, options: SendOptions) -> Self {
        Self {
            phone,
            message,
            options,
        }
    }

    pub fn sender(mut self, sender: SenderName) -> Self {
        self.options.sender = Some(sender);
        self
    }

    pub fn reply_webhook_url(mut self, url: WebhookUrl) -> Self {
        self.options.reply_webhook_url = Some(url);
        self
    }

    pub fn webhook_data(mut self, data: WebhookData) -> Self {
        self.options.webhook_data = Some(data);
        self
    }

    pub fn phone(&self) -> &E164Phone {
        &self.phone
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOtp {
    phone: E164Phone,
    user_id: UserId,
    message: Option<MessageText>,
    lifetime: OtpLifetime,
    length: OtpLength,
}

impl GenerateOtp {
    /// Placeholder Textbelt replaces with the generated code inside a custom message.
    pub const PLACEHOLDER: &'static str = "$OTP";

    pub fn new(phone: E164Phone, user_id: UserId) -> Self {
        Self {
            phone,
            user_id,
            message: None,
            lifetime: OtpLifetime::default(),
            length: OtpLength::default(),
        }
    }

    /// Custom message; should contain [`GenerateOtp::PLACEHOLDER`].
    pub fn message(mut self, message: MessageText) -> Self {
        self.message = Some(message);
        self
    }

    pub fn lifetime(mut self, lifetime: OtpLifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn length(mut self, length: OtpLength) -> Self {
        self.length = length;
        self
    }

    pub fn phone(&self) -> &E164Phone {
        &self.phone
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn custom_message(&self) -> Option<&MessageText> {
        self.message.as_ref()
    }

    pub fn otp_lifetime(&self) -> OtpLifetime {
        self.lifetime
    }

    pub fn otp_length(&self) -> OtpLength {
        self.length
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOtp {
    otp: OtpCode,
    user_id: UserId,
}

impl VerifyOtp {
    pub fn new(otp: OtpCode, user_id: UserId) -> Self {
        Self { otp, user_id }
    }

    pub fn otp(&self) -> &OtpCode {
        &self.otp
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}
