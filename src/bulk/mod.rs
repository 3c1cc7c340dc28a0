//! Bulk sending: validate, split into batches, dispatch concurrently, aggregate.
//!
//! [`crate::TextbeltClient::send_bulk`] is the entry point. Each batch's calls run
//! concurrently (at most `batch_size` in flight), batches run one after another with the
//! configured delay in between, and per-recipient failures are recorded in the
//! [`BulkReport`] instead of failing the run. Two conditions stop a run early and surface as
//! [`BulkSendError`]: the API reporting exhausted quota before anything was sent, and HTTP
//! 429. Both carry the partial report of the batches that did run.

mod batch;
mod dispatch;
mod report;
mod request;

use std::time::Duration;

use tracing::info;

pub use batch::partition;
pub use dispatch::{Call, Cooperative, Executor, SendAttempt, Threaded};
pub use report::{BulkReport, RecipientOutcome, aggregate};
pub use request::{BulkRequest, PlannedSend, ValidatedBulk};

use crate::client::TextbeltClient;
use crate::domain::{SendText, ValidationError};
use dispatch::{Abort, dispatch};

#[derive(Debug, thiserror::Error)]
/// Errors that stop a bulk send as a whole.
///
/// Per-recipient failures are not errors; they are reported in [`BulkReport`].
pub enum BulkSendError {
    /// The request was rejected before any network call.
    #[error("invalid bulk request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// The API reported exhausted quota before any message of the run was sent.
    #[error("quota exceeded: {message}")]
    QuotaExceeded {
        message: String,
        partial: Box<BulkReport>,
    },

    /// The API answered HTTP 429. Bulk sends never retry on their own.
    #[error(
        "rate limited by the API{}",
        .retry_after.map(|d| format!("; retry after {}s", d.as_secs())).unwrap_or_default()
    )]
    RateLimited {
        retry_after: Option<Duration>,
        partial: Box<BulkReport>,
    },
}

impl BulkSendError {
    /// Outcomes of the batches that ran before the abort, if any ran.
    pub fn partial(&self) -> Option<&BulkReport> {
        match self {
            Self::InvalidRequest(_) => None,
            Self::QuotaExceeded { partial, .. } | Self::RateLimited { partial, .. } => {
                Some(partial.as_ref())
            }
        }
    }
}

pub(crate) async fn run<E>(
    client: &TextbeltClient,
    bulk: &ValidatedBulk,
    executor: &E,
) -> Result<BulkReport, BulkSendError>
where
    E: Executor + ?Sized,
{
    let key = bulk.key().unwrap_or_else(|| client.key()).clone();
    let options = bulk.options().clone();
    info!(
        recipients = bulk.len(),
        batch_size = bulk.batch_size(),
        delay_ms = bulk.delay().as_millis() as u64,
        "starting bulk send"
    );

    let make_call = |send: &PlannedSend| -> Call {
        let client = client.clone();
        let key = key.clone();
        let request =
            SendText::with_options(send.phone.clone(), send.message.clone(), options.clone());
        Box::pin(async move { client.send_text_with_key(&request, &key).await })
    };

    let dispatched = dispatch(
        bulk.plan(),
        bulk.batch_size(),
        bulk.delay(),
        executor,
        make_call,
    )
    .await;
    let report = aggregate(bulk.len(), dispatched.outcomes);
    info!(
        successful = report.successful_messages(),
        failed = report.failed_messages(),
        skipped = report.skipped_messages(),
        "bulk send finished"
    );

    match dispatched.abort {
        None => Ok(report),
        Some(Abort::QuotaExceeded { message }) => Err(BulkSendError::QuotaExceeded {
            message,
            partial: Box::new(report),
        }),
        Some(Abort::RateLimited { retry_after }) => Err(BulkSendError::RateLimited {
            retry_after,
            partial: Box::new(report),
        }),
    }
}
