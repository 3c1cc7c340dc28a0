use std::fmt;

use phonenumber::country;

use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// Textbelt API key (`key`).
///
/// Invariant: non-empty after trimming. `Debug` redacts the value.
pub struct ApiKey(String);

impl ApiKey {
    /// Form field name used by Textbelt (`key`).
    pub const FIELD: &'static str = "key";

    /// Suffix that switches a key into Textbelt's free test mode.
    pub const TEST_SUFFIX: &'static str = "_test";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The test-mode variant of this key: sends are simulated and no quota is used.
    pub fn test_variant(&self) -> Self {
        if self.0.ends_with(Self::TEST_SUFFIX) {
            return self.clone();
        }
        Self(format!("{}{}", self.0, Self::TEST_SUFFIX))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Phone number in E.164 format as sent to Textbelt (`phone`).
///
/// Invariant: `+`, then a non-zero digit, then 1 to 14 more digits. Surrounding whitespace
/// is trimmed; no other normalization happens. To normalize national-format input, parse
/// into [`PhoneNumber`] and convert.
pub struct E164Phone(String);

impl E164Phone {
    /// Form field name used by Textbelt (`phone`).
    pub const FIELD: &'static str = "phone";

    /// Maximum number of digits allowed by E.164.
    pub const MAX_DIGITS: usize = 15;

    /// Create a validated E.164 phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !is_e164(trimmed) {
            return Err(ValidationError::InvalidPhoneNumber {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The E.164 string, including the leading `+`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for E164Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PhoneNumber> for E164Phone {
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

/// Returns `true` if `value` is `+` followed by 2..=15 digits, the first of which is non-zero.
pub fn is_e164(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('+') else {
        return false;
    };
    let bytes = digits.as_bytes();
    (2..=E164Phone::MAX_DIGITS).contains(&bytes.len())
        && matches!(bytes[0], b'1'..=b'9')
        && bytes.iter().all(u8::is_ascii_digit)
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty {
                field: E164Phone::FIELD,
            });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        if !is_e164(&e164) {
            return Err(ValidationError::InvalidPhoneNumber { input: raw });
        }

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message body (`message`).
///
/// Invariant: non-empty after trimming and at most [`MessageText::MAX_CHARS`] characters.
/// The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by Textbelt (`message`).
    pub const FIELD: &'static str = "message";

    /// Maximum message length accepted by Textbelt.
    pub const MAX_CHARS: usize = 2000;

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let chars = value.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender name shown to carriers for compliance (`sender`).
///
/// Invariant: non-empty after trimming.
pub struct SenderName(String);

impl SenderName {
    /// Form field name used by Textbelt (`sender`).
    pub const FIELD: &'static str = "sender";

    /// Create a validated sender name.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// URL that receives reply webhooks (`replyWebhookUrl`).
///
/// Invariant: an absolute `http` or `https` URL.
pub struct WebhookUrl(url::Url);

impl WebhookUrl {
    /// Form field name used by Textbelt (`replyWebhookUrl`).
    pub const FIELD: &'static str = "replyWebhookUrl";

    /// Parse and validate a webhook URL.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let parsed = url::Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl {
            input: trimmed.to_owned(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl {
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(parsed))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Opaque data echoed back in reply webhooks (`webhookData`).
///
/// Invariant: at most [`WebhookData::MAX_CHARS`] characters.
pub struct WebhookData(String);

impl WebhookData {
    /// Form field name used by Textbelt (`webhookData`).
    pub const FIELD: &'static str = "webhookData";

    /// Maximum length accepted by Textbelt.
    pub const MAX_CHARS: usize = 100;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let chars = value.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Textbelt message id (`textId`) returned by `/text` and `/otp/generate`.
///
/// Invariant: non-empty after trimming.
pub struct TextId(String);

impl TextId {
    /// Field name used by Textbelt (`textId`).
    pub const FIELD: &'static str = "textId";

    /// Create a validated [`TextId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated text id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Caller-chosen identifier binding an OTP to a user (`userid`).
///
/// Invariant: non-empty after trimming.
pub struct UserId(String);

impl UserId {
    /// Form field name used by Textbelt (`userid`).
    pub const FIELD: &'static str = "userid";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// One-time password entered by the user (`otp`).
///
/// Invariant: non-empty, ASCII digits only.
pub struct OtpCode(String);

impl OtpCode {
    /// Query parameter name used by Textbelt (`otp`).
    pub const FIELD: &'static str = "otp";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::NotDigits { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// How long a generated OTP stays valid, in seconds (`lifetime`).
///
/// Invariant: `30..=3600`.
pub struct OtpLifetime(u32);

impl OtpLifetime {
    /// Form field name used by Textbelt (`lifetime`).
    pub const FIELD: &'static str = "lifetime";

    /// Minimum allowed lifetime.
    pub const MIN: u32 = 30;
    /// Maximum allowed lifetime.
    pub const MAX: u32 = 3600;

    /// Create a validated lifetime.
    pub fn new(seconds: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&seconds) {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: Self::MIN.into(),
                max: Self::MAX.into(),
                actual: seconds.into(),
            });
        }
        Ok(Self(seconds))
    }

    /// Lifetime in seconds.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for OtpLifetime {
    fn default() -> Self {
        Self(180)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Number of digits in a generated OTP (`length`).
///
/// Invariant: `4..=10`.
pub struct OtpLength(u8);

impl OtpLength {
    /// Form field name used by Textbelt (`length`).
    pub const FIELD: &'static str = "length";

    /// Minimum allowed length.
    pub const MIN: u8 = 4;
    /// Maximum allowed length.
    pub const MAX: u8 = 10;

    /// Create a validated OTP length.
    pub fn new(digits: u8) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&digits) {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: Self::MIN.into(),
                max: Self::MAX.into(),
                actual: digits.into(),
            });
        }
        Ok(Self(digits))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for OtpLength {
    fn default() -> Self {
        Self(6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_validate() {
        let key = ApiKey::new("  key ").unwrap();
        assert_eq!(key.as_str(), "key");
        assert!(ApiKey::new("  ").is_err());

        let sender = SenderName::new(" Acme ").unwrap();
        assert_eq!(sender.as_str(), "Acme");
        assert!(SenderName::new("").is_err());

        let msg = MessageText::new(" hi ").unwrap();
        assert_eq!(msg.as_str(), " hi ");
        assert!(MessageText::new("  ").is_err());

        let text_id = TextId::new(" 12345 ").unwrap();
        assert_eq!(text_id.as_str(), "12345");
        assert!(TextId::new("  ").is_err());

        let user = UserId::new(" user123 ").unwrap();
        assert_eq!(user.as_str(), "user123");
        assert!(UserId::new("").is_err());
    }

    #[test]
    fn api_key_test_variant_appends_suffix_once() {
        let key = ApiKey::new("abc").unwrap();
        assert_eq!(key.test_variant().as_str(), "abc_test");
        assert_eq!(key.test_variant().test_variant().as_str(), "abc_test");
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("secret").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }

    #[test]
    fn e164_accepts_valid_numbers() {
        for input in ["+1234567890", "+441234567890", "+6591234567", " +12025550108 "] {
            assert!(E164Phone::new(input).is_ok(), "{input} should be valid");
        }
        assert_eq!(
            E164Phone::new(" +12025550108 ").unwrap().as_str(),
            "+12025550108"
        );
    }

    #[test]
    fn e164_rejects_malformed_numbers() {
        for input in [
            "1234567890",
            "+1",
            "+0123456789",
            "+1234567890123456",
            "+1234abcd",
            "++12345",
        ] {
            assert!(
                matches!(
                    E164Phone::new(input),
                    Err(ValidationError::InvalidPhoneNumber { .. })
                ),
                "{input} should be rejected"
            );
        }
        assert!(matches!(
            E164Phone::new(""),
            Err(ValidationError::Empty { field: "phone" })
        ));
    }

    #[test]
    fn phone_number_parsing_normalizes_to_e164() {
        let p1 = PhoneNumber::parse(None, "+12025550108").unwrap();
        let p2 = PhoneNumber::parse(Some(country::Id::US), "(202) 555-0108").unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p2.e164(), "+12025550108");
        assert_eq!(p2.raw(), "(202) 555-0108");

        let phone: E164Phone = p2.into();
        assert_eq!(phone.as_str(), "+12025550108");
        assert!(PhoneNumber::parse(None, "not-a-number").is_err());
    }

    #[test]
    fn message_text_enforces_max_length() {
        let at_limit = "x".repeat(MessageText::MAX_CHARS);
        assert!(MessageText::new(at_limit).is_ok());

        let over = "x".repeat(MessageText::MAX_CHARS + 1);
        assert!(matches!(
            MessageText::new(over),
            Err(ValidationError::TooLong { max: 2000, actual: 2001, .. })
        ));
    }

    #[test]
    fn webhook_url_requires_http_scheme() {
        let url = WebhookUrl::new("https://example.com/hook").unwrap();
        assert_eq!(url.as_str(), "https://example.com/hook");
        assert!(WebhookUrl::new("ftp://example.com").is_err());
        assert!(WebhookUrl::new("not a url").is_err());
    }

    #[test]
    fn webhook_data_is_bounded() {
        assert!(WebhookData::new("order-42").is_ok());
        assert!(WebhookData::new("x".repeat(WebhookData::MAX_CHARS + 1)).is_err());
    }

    #[test]
    fn otp_code_requires_digits() {
        assert_eq!(OtpCode::new(" 123456 ").unwrap().as_str(), "123456");
        assert!(matches!(
            OtpCode::new(""),
            Err(ValidationError::Empty { field: "otp" })
        ));
        assert!(matches!(
            OtpCode::new("12a456"),
            Err(ValidationError::NotDigits { field: "otp" })
        ));
    }

    #[test]
    fn otp_ranges_are_enforced() {
        assert!(OtpLifetime::new(OtpLifetime::MIN).is_ok());
        assert!(OtpLifetime::new(OtpLifetime::MAX).is_ok());
        assert!(OtpLifetime::new(10).is_err());
        assert_eq!(OtpLifetime::default().value(), 180);

        assert!(OtpLength::new(6).is_ok());
        assert!(OtpLength::new(2).is_err());
        assert!(OtpLength::new(11).is_err());
        assert_eq!(OtpLength::default().value(), 6);
    }
}
