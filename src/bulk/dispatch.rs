//! Batch-sequential, bounded-parallel dispatch of per-recipient send calls.

use std::time::Duration;

use futures::future::{BoxFuture, join_all};
use tokio::runtime;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::batch::partition;
use super::report::RecipientOutcome;
use super::request::PlannedSend;
use crate::client::TextbeltError;
use crate::domain::SendTextResponse;

/// Result of one send call.
pub type SendAttempt = Result<SendTextResponse, TextbeltError>;

/// A not-yet-awaited send call for one recipient.
pub type Call = BoxFuture<'static, SendAttempt>;

/// Strategy for running the calls of one batch concurrently.
///
/// The dispatcher launches every call of a batch before awaiting any of them, then awaits
/// the whole batch. `await_all` must yield exactly one result per handle, in launch order.
pub trait Executor: Send + Sync {
    type Handle: Send;

    fn launch(&self, call: Call) -> Self::Handle;

    fn await_all(&self, handles: Vec<Self::Handle>) -> BoxFuture<'_, Vec<SendAttempt>>;
}

/// Polls a batch's calls concurrently on the current task. No threads are involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cooperative;

impl Executor for Cooperative {
    type Handle = Call;

    fn launch(&self, call: Call) -> Call {
        call
    }

    fn await_all(&self, handles: Vec<Call>) -> BoxFuture<'_, Vec<SendAttempt>> {
        Box::pin(join_all(handles))
    }
}

/// Spawns each call as a tokio task so a multi-threaded runtime runs them on its worker pool.
#[derive(Debug, Clone, Default)]
pub struct Threaded {
    runtime: Option<runtime::Handle>,
}

impl Threaded {
    /// Spawn onto the runtime of the task that calls [`Executor::launch`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn onto `handle`'s runtime.
    pub fn on(handle: runtime::Handle) -> Self {
        Self {
            runtime: Some(handle),
        }
    }
}

impl Executor for Threaded {
    type Handle = JoinHandle<SendAttempt>;

    fn launch(&self, call: Call) -> JoinHandle<SendAttempt> {
        match &self.runtime {
            Some(handle) => handle.spawn(call),
            None => tokio::spawn(call),
        }
    }

    fn await_all(&self, handles: Vec<JoinHandle<SendAttempt>>) -> BoxFuture<'_, Vec<SendAttempt>> {
        Box::pin(async move {
            let mut attempts = Vec::with_capacity(handles.len());
            for handle in handles {
                let attempt = handle
                    .await
                    .unwrap_or_else(|err| Err(TextbeltError::Transport(Box::new(err))));
                attempts.push(attempt);
            }
            attempts
        })
    }
}

/// Why a run stopped before its last batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Abort {
    QuotaExceeded { message: String },
    RateLimited { retry_after: Option<Duration> },
}

#[derive(Debug)]
pub(crate) struct Dispatched {
    pub outcomes: Vec<RecipientOutcome>,
    pub abort: Option<Abort>,
}

/// Send every planned message, `batch_size` at a time, sleeping `delay` between batches.
///
/// Failed calls become failed outcomes. A 429 in a batch, or a quota-exceeded response while
/// the run has no successful send yet, stops the run once the current batch has finished.
pub(crate) async fn dispatch<E, F>(
    plan: &[PlannedSend],
    batch_size: usize,
    delay: Duration,
    executor: &E,
    mut make_call: F,
) -> Dispatched
where
    E: Executor + ?Sized,
    F: FnMut(&PlannedSend) -> Call,
{
    let batches = partition(plan, batch_size);
    let batch_count = batches.len();
    let mut outcomes = Vec::with_capacity(plan.len());
    let mut successes = 0usize;

    for (index, batch) in batches.into_iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        info!(
            batch = index + 1,
            batches = batch_count,
            size = batch.len(),
            "dispatching batch"
        );

        let handles = batch
            .iter()
            .map(|send| executor.launch(make_call(send)))
            .collect::<Vec<_>>();
        let mut attempts = executor.await_all(handles).await.into_iter();

        let mut quota_message = None;
        let mut rate_limit = None;
        for send in batch {
            let attempt = attempts.next().unwrap_or_else(|| {
                Err(TextbeltError::Transport(
                    "executor returned no result for call".into(),
                ))
            });
            let phone = send.phone.clone();
            let outcome = match attempt {
                Ok(response) => {
                    successes += 1;
                    RecipientOutcome::sent(phone, response.text_id, response.quota_remaining)
                }
                Err(TextbeltError::QuotaExceeded { message }) => {
                    quota_message.get_or_insert_with(|| message.clone());
                    RecipientOutcome::failed(phone, message, Some(0))
                }
                Err(err @ TextbeltError::RateLimited { retry_after }) => {
                    rate_limit.get_or_insert(retry_after);
                    RecipientOutcome::failed(phone, err.to_string(), None)
                }
                Err(TextbeltError::Api {
                    message,
                    quota_remaining,
                }) => RecipientOutcome::failed(phone, message, quota_remaining),
                Err(other) => RecipientOutcome::failed(phone, other.to_string(), None),
            };
            if let Some(error) = outcome.error.as_deref() {
                warn!(phone = %outcome.phone, error, "recipient send failed");
            }
            outcomes.push(outcome);
        }
        debug!(batch = index + 1, successes, "batch finished");

        let abort = match (rate_limit, quota_message) {
            (Some(retry_after), _) => Some(Abort::RateLimited { retry_after }),
            (None, Some(message)) if successes == 0 => Some(Abort::QuotaExceeded { message }),
            _ => None,
        };
        if let Some(abort) = abort {
            warn!(
                batch = index + 1,
                skipped = plan.len() - outcomes.len(),
                ?abort,
                "aborting bulk send"
            );
            return Dispatched {
                outcomes,
                abort: Some(abort),
            };
        }
    }

    Dispatched {
        outcomes,
        abort: None,
    }
}
