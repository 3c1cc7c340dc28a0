//! Blocking wrapper around the async [`crate::TextbeltClient`].
//!
//! The client owns a multi-threaded tokio runtime and blocks the calling thread on each
//! operation. Calling it from inside an async runtime panics; use the async client there.

use tokio::runtime::Runtime;

use crate::bulk::{BulkReport, BulkRequest, BulkSendError, Threaded};
use crate::client::{self, TextbeltError};
use crate::domain::{
    ApiKey, GenerateOtp, GenerateOtpResponse, QuotaResponse, SendText, SendTextResponse,
    StatusResponse, TextId, VerifyOtp, VerifyOtpResponse,
};

/// Blocking Textbelt client.
///
/// ```rust,no_run
/// use textbelt::{ApiKey, E164Phone, MessageText, SendText};
///
/// let client = textbelt::blocking::TextbeltClient::new(ApiKey::new("...")?)?;
/// let request = SendText::new(E164Phone::new("+12025550108")?, MessageText::new("hello")?);
/// let response = client.send_text(&request)?;
/// println!("{:?}", response.text_id);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TextbeltClient {
    inner: client::TextbeltClient,
    runtime: Runtime,
}

impl TextbeltClient {
    /// Create a client using the default base URL.
    pub fn new(key: ApiKey) -> Result<Self, TextbeltError> {
        Self::from_async(client::TextbeltClient::new(key))
    }

    /// Wrap an already configured async client, e.g. one built with
    /// [`crate::TextbeltClientBuilder`].
    pub fn from_async(inner: client::TextbeltClient) -> Result<Self, TextbeltError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|err| TextbeltError::Transport(Box::new(err)))?;
        Ok(Self { inner, runtime })
    }

    pub fn send_text(&self, request: &SendText) -> Result<SendTextResponse, TextbeltError> {
        self.runtime.block_on(self.inner.send_text(request))
    }

    pub fn send_test(&self, request: &SendText) -> Result<SendTextResponse, TextbeltError> {
        self.runtime.block_on(self.inner.send_test(request))
    }

    pub fn check_status(&self, text_id: &TextId) -> Result<StatusResponse, TextbeltError> {
        self.runtime.block_on(self.inner.check_status(text_id))
    }

    pub fn check_quota(&self) -> Result<QuotaResponse, TextbeltError> {
        self.runtime.block_on(self.inner.check_quota())
    }

    pub fn check_quota_for(&self, key: &ApiKey) -> Result<QuotaResponse, TextbeltError> {
        self.runtime.block_on(self.inner.check_quota_for(key))
    }

    pub fn generate_otp(&self, request: &GenerateOtp) -> Result<GenerateOtpResponse, TextbeltError> {
        self.runtime.block_on(self.inner.generate_otp(request))
    }

    pub fn verify_otp(&self, request: &VerifyOtp) -> Result<VerifyOtpResponse, TextbeltError> {
        self.runtime.block_on(self.inner.verify_otp(request))
    }

    /// Send a bulk request, running each batch's calls as tasks on the owned runtime.
    pub fn send_bulk(&self, request: &BulkRequest) -> Result<BulkReport, BulkSendError> {
        let executor = Threaded::on(self.runtime.handle().clone());
        self.runtime
            .block_on(self.inner.send_bulk_with(request, &executor))
    }
}
