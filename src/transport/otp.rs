use serde::Deserialize;

use super::text::{Reply, TransportError, decode_text_id};
use crate::domain::{
    ApiKey, E164Phone, GenerateOtp, GenerateOtpResponse, MessageText, OtpCode, OtpLength,
    OtpLifetime, UserId, VerifyOtp, VerifyOtpResponse,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateOtpJsonResponse {
    success: bool,
    #[serde(default)]
    quota_remaining: Option<u64>,
    #[serde(default)]
    text_id: Option<String>,
    #[serde(default)]
    otp: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpJsonResponse {
    success: bool,
    #[serde(default)]
    is_valid_otp: bool,
}

pub fn encode_generate_otp_form(request: &GenerateOtp, key: &ApiKey) -> Vec<(String, String)> {
    let mut params = vec![
        (E164Phone::FIELD.to_owned(), request.phone().as_str().to_owned()),
        (UserId::FIELD.to_owned(), request.user_id().as_str().to_owned()),
        (ApiKey::FIELD.to_owned(), key.as_str().to_owned()),
    ];
    if let Some(message) = request.custom_message() {
        params.push((MessageText::FIELD.to_owned(), message.as_str().to_owned()));
    }
    params.push((
        OtpLifetime::FIELD.to_owned(),
        request.otp_lifetime().value().to_string(),
    ));
    params.push((
        OtpLength::FIELD.to_owned(),
        request.otp_length().value().to_string(),
    ));
    params
}

pub fn encode_verify_otp_query(request: &VerifyOtp, key: &ApiKey) -> Vec<(String, String)> {
    vec![
        (OtpCode::FIELD.to_owned(), request.otp().as_str().to_owned()),
        (UserId::FIELD.to_owned(), request.user_id().as_str().to_owned()),
        (ApiKey::FIELD.to_owned(), key.as_str().to_owned()),
    ]
}

pub fn decode_generate_otp_json_response(
    json: &str,
) -> Result<Reply<GenerateOtpResponse>, TransportError> {
    let parsed: GenerateOtpJsonResponse = serde_json::from_str(json)?;
    if !parsed.success {
        return Ok(Reply::Refused {
            error: parsed.error,
            quota_remaining: parsed.quota_remaining,
        });
    }
    Ok(Reply::Accepted(GenerateOtpResponse {
        success: true,
        quota_remaining: parsed.quota_remaining.unwrap_or_default(),
        text_id: decode_text_id(parsed.text_id)?,
        otp: parsed.otp.filter(|otp| !otp.is_empty()),
        error: parsed.error,
    }))
}

pub fn decode_verify_otp_json_response(json: &str) -> Result<VerifyOtpResponse, TransportError> {
    let parsed: VerifyOtpJsonResponse = serde_json::from_str(json)?;
    Ok(VerifyOtpResponse {
        success: parsed.success,
        is_valid_otp: parsed.is_valid_otp,
    })
}
