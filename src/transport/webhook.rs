use serde::Deserialize;

use crate::domain::{ReplyWebhook, TextId};

use super::text::TransportError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyWebhookJson {
    text_id: String,
    from_number: String,
    text: String,
    #[serde(default)]
    data: Option<String>,
}

pub fn decode_reply_webhook_json(json: &str) -> Result<ReplyWebhook, TransportError> {
    let parsed: ReplyWebhookJson = serde_json::from_str(json)?;
    Ok(ReplyWebhook {
        text_id: TextId::new(parsed.text_id).map_err(|_| TransportError::EmptyTextId)?,
        from_number: parsed.from_number,
        text: parsed.text,
        data: parsed.data.filter(|data| !data.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_reply_with_data() {
        let json = r#"{"textId": "123", "fromNumber": "+12025550108", "text": "STOP", "data": "order-42"}"#;
        let reply = decode_reply_webhook_json(json).unwrap();
        assert_eq!(reply.text_id.as_str(), "123");
        assert_eq!(reply.from_number, "+12025550108");
        assert_eq!(reply.text, "STOP");
        assert_eq!(reply.data.as_deref(), Some("order-42"));
    }

    #[test]
    fn decode_reply_without_data() {
        let json = r#"{"textId": "123", "fromNumber": "+12025550108", "text": "yes"}"#;
        let reply = decode_reply_webhook_json(json).unwrap();
        assert_eq!(reply.data, None);
    }

    #[test]
    fn decode_reply_rejects_blank_text_id() {
        let json = r#"{"textId": " ", "fromNumber": "+12025550108", "text": "yes"}"#;
        assert!(matches!(
            decode_reply_webhook_json(json),
            Err(TransportError::EmptyTextId)
        ));
    }

    #[test]
    fn decode_reply_rejects_missing_fields() {
        assert!(matches!(
            decode_reply_webhook_json(r#"{"textId": "123"}"#),
            Err(TransportError::Json(_))
        ));
    }
}
