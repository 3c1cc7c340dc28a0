use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    TooLong { field: &'static str, max: usize, actual: usize },
    OutOfRange { field: &'static str, min: u64, max: u64, actual: u64 },
    NotDigits { field: &'static str },
    InvalidUrl { input: String },
    NoMessage,
    ConflictingMessages,
    MissingMessage { phone: String },
    UnexpectedMessage { phone: String },
    BatchSizeZero,
    DelayTooShort { min_ms: u128, actual_ms: u128 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => {
                write!(f, "phone number must be in E.164 format: {input}")
            }
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{field} out of range: {actual} (expected {min}..={max})"
            ),
            Self::NotDigits { field } => write!(f, "{field} must contain only digits"),
            Self::InvalidUrl { input } => write!(f, "invalid URL: {input}"),
            Self::NoMessage => write!(
                f,
                "either a shared message or per-recipient messages must be provided"
            ),
            Self::ConflictingMessages => write!(
                f,
                "a shared message and per-recipient messages cannot both be provided"
            ),
            Self::MissingMessage { phone } => write!(f, "no message provided for {phone}"),
            Self::UnexpectedMessage { phone } => {
                write!(f, "message provided for {phone}, which is not a recipient")
            }
            Self::BatchSizeZero => write!(f, "batch size must be at least 1"),
            Self::DelayTooShort { min_ms, actual_ms } => write!(
                f,
                "delay between batches is too short: {actual_ms}ms (min {min_ms}ms)"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
