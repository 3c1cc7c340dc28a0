//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod otp;
mod status;
mod text;
mod webhook;

pub use otp::{
    decode_generate_otp_json_response, decode_verify_otp_json_response, encode_generate_otp_form,
    encode_verify_otp_query,
};
pub use status::{decode_quota_json_response, decode_status_json_response};
pub use text::{
    Reply, decode_retry_after, decode_send_text_json_response, encode_send_text_form,
};
pub use webhook::decode_reply_webhook_json;
