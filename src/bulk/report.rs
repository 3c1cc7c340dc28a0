use crate::domain::{E164Phone, TextId};

/// Result of one recipient's send within a bulk run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientOutcome {
    pub phone: E164Phone,
    pub success: bool,
    pub text_id: Option<TextId>,
    pub error: Option<String>,
    /// Remaining quota reported by the call, when the API reported one.
    pub quota_remaining: Option<u64>,
}

impl RecipientOutcome {
    pub(crate) fn sent(phone: E164Phone, text_id: Option<TextId>, quota_remaining: u64) -> Self {
        Self {
            phone,
            success: true,
            text_id,
            error: None,
            quota_remaining: Some(quota_remaining),
        }
    }

    pub(crate) fn failed(
        phone: E164Phone,
        error: impl Into<String>,
        quota_remaining: Option<u64>,
    ) -> Self {
        Self {
            phone,
            success: false,
            text_id: None,
            error: Some(error.into()),
            quota_remaining,
        }
    }
}

/// Aggregate result of a bulk send.
///
/// Results are kept in the order recipients appeared in the request. When a run is aborted,
/// recipients of skipped batches have no outcome and are counted by
/// [`BulkReport::skipped_messages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport {
    total_messages: usize,
    successful_messages: usize,
    failed_messages: usize,
    results: Vec<RecipientOutcome>,
    quota_remaining: Option<u64>,
}

impl BulkReport {
    pub fn total_messages(&self) -> usize {
        self.total_messages
    }

    pub fn successful_messages(&self) -> usize {
        self.successful_messages
    }

    pub fn failed_messages(&self) -> usize {
        self.failed_messages
    }

    /// Recipients that were never dispatched because the run was aborted.
    pub fn skipped_messages(&self) -> usize {
        self.total_messages.saturating_sub(self.results.len())
    }

    /// Every recipient was sent successfully.
    pub fn success(&self) -> bool {
        self.successful_messages == self.total_messages
    }

    /// Some, but not all, recipients were sent successfully.
    pub fn partial_success(&self) -> bool {
        self.successful_messages > 0 && self.successful_messages < self.total_messages
    }

    /// No recipient was sent successfully.
    pub fn is_total_failure(&self) -> bool {
        self.total_messages > 0 && self.successful_messages == 0
    }

    pub fn results(&self) -> &[RecipientOutcome] {
        &self.results
    }

    /// Outcome for `phone`; the first one if the phone was listed more than once.
    pub fn outcome(&self, phone: &E164Phone) -> Option<&RecipientOutcome> {
        self.results.iter().find(|outcome| &outcome.phone == phone)
    }

    /// Error text of every failed recipient, in request order.
    pub fn errors(&self) -> impl Iterator<Item = (&E164Phone, &str)> {
        self.results
            .iter()
            .filter_map(|outcome| outcome.error.as_deref().map(|err| (&outcome.phone, err)))
    }

    pub fn error_for(&self, phone: &E164Phone) -> Option<&str> {
        self.errors()
            .find(|(failed, _)| *failed == phone)
            .map(|(_, err)| err)
    }

    /// Remaining-quota snapshot for the run: the lowest value any call reported, not the
    /// value from the last call. Calls within a batch complete in any order, so the lowest
    /// report is the closest to the quota left after the run. `None` if no call reported
    /// one. Informational only; [`crate::TextbeltClient::check_quota`] gives the
    /// authoritative figure.
    pub fn quota_remaining(&self) -> Option<u64> {
        self.quota_remaining
    }
}

/// Fold per-recipient outcomes into a [`BulkReport`].
///
/// `outcomes` must already be in request order; `total` is the number of recipients in the
/// request, which exceeds `outcomes.len()` only for aborted runs.
pub fn aggregate(total: usize, outcomes: Vec<RecipientOutcome>) -> BulkReport {
    let successful_messages = outcomes.iter().filter(|outcome| outcome.success).count();
    let failed_messages = outcomes.len() - successful_messages;
    let quota_remaining = outcomes
        .iter()
        .filter_map(|outcome| outcome.quota_remaining)
        .min();

    BulkReport {
        total_messages: total.max(outcomes.len()),
        successful_messages,
        failed_messages,
        results: outcomes,
        quota_remaining,
    }
}
