use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use crate::domain::{
    ApiKey, E164Phone, MessageText, SendOptions, SenderName, ValidationError, WebhookData,
    WebhookUrl,
};

/// A bulk send: many recipients, one shared message or one message per recipient.
///
/// Nothing is checked until [`BulkRequest::validate`]; the client validates before any
/// network call.
///
/// ```rust
/// use std::time::Duration;
/// use textbelt::BulkRequest;
///
/// let request = BulkRequest::shared(["+12025550108", "+12025550109"], "Store opens at 9")
///     .batch_size(50)
///     .delay(Duration::from_millis(500));
/// let validated = request.validate().unwrap();
/// assert_eq!(validated.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BulkRequest {
    phones: Vec<String>,
    message: Option<String>,
    individual_messages: Option<HashMap<String, String>>,
    key: Option<ApiKey>,
    options: SendOptions,
    batch_size: usize,
    delay: Duration,
}

impl BulkRequest {
    /// Recipients dispatched concurrently per batch unless overridden.
    pub const DEFAULT_BATCH_SIZE: usize = 100;
    /// Pause between batches unless overridden.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);
    /// Shortest accepted pause between batches.
    pub const MIN_DELAY: Duration = Duration::from_millis(100);

    /// Start a request for `phones` with no message yet.
    pub fn new<I, S>(phones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phones: phones.into_iter().map(Into::into).collect(),
            message: None,
            individual_messages: None,
            key: None,
            options: SendOptions::default(),
            batch_size: Self::DEFAULT_BATCH_SIZE,
            delay: Self::DEFAULT_DELAY,
        }
    }

    /// Send the same `message` to every phone.
    pub fn shared<I, S>(phones: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(phones).message(message)
    }

    /// Send `messages[phone]` to each phone. The map must cover exactly the phones listed.
    pub fn per_recipient<I, S>(phones: I, messages: HashMap<String, String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(phones).individual_messages(messages)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn individual_messages(mut self, messages: HashMap<String, String>) -> Self {
        self.individual_messages = Some(messages);
        self
    }

    /// Use `key` instead of the client's key for this run.
    pub fn key(mut self, key: ApiKey) -> Self {
        self.key = Some(key);
        self
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

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    /// Check the request and resolve every recipient's message.
    ///
    /// Checks run in order and stop at the first failure: recipients present, every
    /// recipient in E.164, exactly one message source covering every recipient, batch
    /// size of at least one, delay of at least [`BulkRequest::MIN_DELAY`].
    pub fn validate(&self) -> Result<ValidatedBulk, ValidationError> {
        if self.phones.is_empty() {
            return Err(ValidationError::Empty {
                field: E164Phone::FIELD,
            });
        }

        let recipients = self
            .phones
            .iter()
            .map(E164Phone::new)
            .collect::<Result<Vec<_>, _>>()?;

        let plan = match (&self.message, &self.individual_messages) {
            (None, None) => return Err(ValidationError::NoMessage),
            (Some(_), Some(_)) => return Err(ValidationError::ConflictingMessages),
            (Some(message), None) => {
                let message = MessageText::new(message.as_str())?;
                recipients
                    .into_iter()
                    .map(|phone| PlannedSend {
                        phone,
                        message: message.clone(),
                    })
                    .collect()
            }
            (None, Some(messages)) => plan_individual(recipients, messages)?,
        };

        if self.batch_size == 0 {
            return Err(ValidationError::BatchSizeZero);
        }
        if self.delay < Self::MIN_DELAY {
            return Err(ValidationError::DelayTooShort {
                min_ms: Self::MIN_DELAY.as_millis(),
                actual_ms: self.delay.as_millis(),
            });
        }

        Ok(ValidatedBulk {
            plan,
            key: self.key.clone(),
            options: self.options.clone(),
            batch_size: self.batch_size,
            delay: self.delay,
        })
    }
}

fn plan_individual(
    recipients: Vec<E164Phone>,
    messages: &HashMap<String, String>,
) -> Result<Vec<PlannedSend>, ValidationError> {
    let by_phone = messages
        .iter()
        .map(|(phone, message)| (phone.trim(), message))
        .collect::<HashMap<_, _>>();

    let listed = recipients
        .iter()
        .map(E164Phone::as_str)
        .collect::<BTreeSet<_>>();
    let extra = by_phone
        .keys()
        .filter(|phone| !listed.contains(*phone))
        .min();

    let mut plan = Vec::with_capacity(recipients.len());
    for phone in &recipients {
        let Some(message) = by_phone.get(phone.as_str()) else {
            return Err(ValidationError::MissingMessage {
                phone: phone.as_str().to_owned(),
            });
        };
        plan.push(PlannedSend {
            phone: phone.clone(),
            message: MessageText::new(message.as_str())?,
        });
    }

    if let Some(extra) = extra {
        return Err(ValidationError::UnexpectedMessage {
            phone: (*extra).to_owned(),
        });
    }
    Ok(plan)
}

/// One resolved recipient/message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSend {
    pub phone: E164Phone,
    pub message: MessageText,
}

/// A [`BulkRequest`] that passed validation, with each recipient's message resolved.
#[derive(Debug, Clone)]
pub struct ValidatedBulk {
    plan: Vec<PlannedSend>,
    key: Option<ApiKey>,
    options: SendOptions,
    batch_size: usize,
    delay: Duration,
}

impl ValidatedBulk {
    /// Recipient/message pairs in request order.
    pub fn plan(&self) -> &[PlannedSend] {
        &self.plan
    }

    pub fn len(&self) -> usize {
        self.plan.len()
    }

    /// Always `false`: validation rejects empty requests.
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    pub fn key(&self) -> Option<&ApiKey> {
        self.key.as_ref()
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P1: &str = "+12025550108";
    const P2: &str = "+12025550109";

    fn messages(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(phone, message)| ((*phone).to_owned(), (*message).to_owned()))
            .collect()
    }

    #[test]
    fn shared_message_is_resolved_for_every_recipient() {
        let validated = BulkRequest::shared([P1, P2], "Test message")
            .validate()
            .unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(validated.batch_size(), BulkRequest::DEFAULT_BATCH_SIZE);
        assert_eq!(validated.delay(), BulkRequest::DEFAULT_DELAY);
        for send in validated.plan() {
            assert_eq!(send.message.as_str(), "Test message");
        }
        assert_eq!(validated.plan()[1].phone.as_str(), P2);
    }

    #[test]
    fn individual_messages_are_resolved_per_recipient() {
        let validated = BulkRequest::per_recipient(
            [P1, P2],
            messages(&[(P1, "Message 1"), (P2, "Message 2")]),
        )
        .validate()
        .unwrap();
        assert_eq!(validated.plan()[0].message.as_str(), "Message 1");
        assert_eq!(validated.plan()[1].message.as_str(), "Message 2");
    }

    #[test]
    fn empty_recipients_are_rejected() {
        let err = BulkRequest::shared(Vec::<String>::new(), "hi")
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "phone" });
    }

    #[test]
    fn non_e164_recipient_is_rejected() {
        let err = BulkRequest::shared(["12025550108"], "hi")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPhoneNumber { .. }));
    }

    #[test]
    fn missing_message_source_is_rejected() {
        let err = BulkRequest::new([P1]).validate().unwrap_err();
        assert_eq!(err, ValidationError::NoMessage);
    }

    #[test]
    fn both_message_sources_are_rejected() {
        let err = BulkRequest::shared([P1], "hi")
            .individual_messages(messages(&[(P1, "hi")]))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::ConflictingMessages);
    }

    #[test]
    fn individual_messages_missing_a_recipient_are_rejected() {
        let err = BulkRequest::per_recipient([P1, P2], messages(&[(P1, "Message 1")]))
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingMessage {
                phone: P2.to_owned()
            }
        );
    }

    #[test]
    fn individual_messages_for_unknown_phone_are_rejected() {
        let err = BulkRequest::per_recipient([P1], messages(&[(P1, "a"), (P2, "b")]))
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnexpectedMessage {
                phone: P2.to_owned()
            }
        );
    }

    #[test]
    fn repeated_recipient_shares_its_individual_message() {
        let validated = BulkRequest::per_recipient([P1, P1], messages(&[(P1, "again")]))
            .validate()
            .unwrap();
        assert_eq!(validated.len(), 2);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = BulkRequest::shared([P1], "hi")
            .batch_size(0)
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::BatchSizeZero);
    }

    #[test]
    fn delay_below_minimum_is_rejected() {
        let err = BulkRequest::shared([P1], "hi")
            .delay(Duration::from_millis(10))
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::DelayTooShort {
                min_ms: 100,
                actual_ms: 10
            }
        );
        assert!(
            BulkRequest::shared([P1], "hi")
                .delay(BulkRequest::MIN_DELAY)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn checks_short_circuit_in_order() {
        let err = BulkRequest::new(["bad"])
            .batch_size(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPhoneNumber { .. }));

        let err = BulkRequest::new([P1])
            .batch_size(0)
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::NoMessage);
    }

    #[test]
    fn empty_shared_message_is_rejected() {
        let err = BulkRequest::shared([P1], "   ").validate().unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "message" });
    }
}
