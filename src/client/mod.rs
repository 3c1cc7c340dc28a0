//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tracing::debug;

use crate::bulk::{self, BulkReport, BulkRequest, BulkSendError, Cooperative, Executor};
use crate::domain::{
    ApiKey, GenerateOtp, GenerateOtpResponse, QuotaResponse, SendText, SendTextResponse,
    StatusResponse, TextId, ValidationError, VerifyOtp, VerifyOtpResponse,
};
use crate::transport::Reply;

const DEFAULT_BASE_URL: &str = "https://textbelt.com";

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;

    fn get<'a>(
        &'a self,
        url: &'a str,
        query: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }

    fn get<'a>(
        &'a self,
        url: &'a str,
        query: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.get(url).query(&query).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by single calls on [`TextbeltClient`].
///
/// Bulk sends report their own [`BulkSendError`]; inside a bulk run these errors become
/// per-recipient failures unless they stop the run.
pub enum TextbeltError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server (other than 429).
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// HTTP 429. `retry_after` is the server's hint, when it sent one.
    #[error(
        "rate limited by the API{}",
        .retry_after.map(|d| format!("; retry after {}s", d.as_secs())).unwrap_or_default()
    )]
    RateLimited { retry_after: Option<Duration> },

    /// The API refused the send with no quota left.
    #[error("quota exceeded: {message}")]
    QuotaExceeded { message: String },

    /// The API reported `success: false` for any other reason.
    #[error("API error: {message}")]
    Api {
        message: String,
        quota_remaining: Option<u64>,
    },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`TextbeltClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct TextbeltClientBuilder {
    key: ApiKey,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TextbeltClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(key: ApiKey) -> Self {
        Self {
            key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API base URL (`https://textbelt.com` by default).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`TextbeltClient`].
    pub fn build(self) -> Result<TextbeltClient, TextbeltError> {
        parse_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| TextbeltError::Transport(Box::new(err)))?;

        Ok(TextbeltClient {
            key: self.key,
            base_url: self.base_url.trim().to_owned(),
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<url::Url, ValidationError> {
    let invalid = || ValidationError::InvalidUrl {
        input: raw.to_owned(),
    };
    let parsed = url::Url::parse(raw.trim()).map_err(|_| invalid())?;
    if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(parsed)
}

#[derive(Clone)]
/// High-level Textbelt client.
///
/// This type orchestrates request validation, form encoding, and response parsing against:
/// - `POST /text` for sending messages,
/// - `GET /status/{textId}` for delivery status,
/// - `GET /quota/{key}` for remaining quota,
/// - `POST /otp/generate` and `GET /otp/verify` for one-time passwords.
///
/// Cloning is cheap; clones share the underlying HTTP connection pool.
pub struct TextbeltClient {
    key: ApiKey,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl TextbeltClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`TextbeltClient::builder`].
    pub fn new(key: ApiKey) -> Self {
        Self {
            key,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(key: ApiKey) -> TextbeltClientBuilder {
        TextbeltClientBuilder::new(key)
    }

    pub(crate) fn key(&self) -> &ApiKey {
        &self.key
    }

    /// Send one SMS.
    ///
    /// Errors:
    /// - [`TextbeltError::RateLimited`] for HTTP 429,
    /// - [`TextbeltError::QuotaExceeded`] when the API refuses with zero quota remaining,
    /// - [`TextbeltError::Api`] for any other `success: false` response,
    /// - [`TextbeltError::HttpStatus`] for other non-2xx HTTP responses.
    pub async fn send_text(&self, request: &SendText) -> Result<SendTextResponse, TextbeltError> {
        self.send_text_with_key(request, &self.key).await
    }

    /// Send one SMS with the test-mode key (`<key>_test`). Nothing is delivered and no quota
    /// is used.
    pub async fn send_test(&self, request: &SendText) -> Result<SendTextResponse, TextbeltError> {
        self.send_text_with_key(request, &self.key.test_variant())
            .await
    }

    pub(crate) async fn send_text_with_key(
        &self,
        request: &SendText,
        key: &ApiKey,
    ) -> Result<SendTextResponse, TextbeltError> {
        let url = self.endpoint(&["text"])?;
        debug!(endpoint = %url, phone = %request.phone(), "sending text");

        let params = crate::transport::encode_send_text_form(request, key);
        let body = self.post(&url, params).await?;
        let reply = crate::transport::decode_send_text_json_response(&body)
            .map_err(|err| TextbeltError::Parse(Box::new(err)))?;
        accepted(reply)
    }

    /// Look up the delivery status of a sent message.
    pub async fn check_status(&self, text_id: &TextId) -> Result<StatusResponse, TextbeltError> {
        let url = self.endpoint(&["status", text_id.as_str()])?;
        debug!(endpoint = %url, "checking status");

        let body = self.get(&url, Vec::new()).await?;
        crate::transport::decode_status_json_response(&body)
            .map_err(|err| TextbeltError::Parse(Box::new(err)))
    }

    /// Look up the remaining quota of the client's key.
    pub async fn check_quota(&self) -> Result<QuotaResponse, TextbeltError> {
        self.check_quota_for(&self.key).await
    }

    /// Look up the remaining quota of `key`, e.g. a key used to override the client's key
    /// in a [`BulkRequest`].
    pub async fn check_quota_for(&self, key: &ApiKey) -> Result<QuotaResponse, TextbeltError> {
        let url = self.endpoint(&["quota", key.as_str()])?;
        debug!("checking quota");

        let body = self.get(&url, Vec::new()).await?;
        let parsed = crate::transport::decode_quota_json_response(&body)
            .map_err(|err| TextbeltError::Parse(Box::new(err)))?;
        if !parsed.success {
            return Err(TextbeltError::Api {
                message: "quota lookup failed".to_owned(),
                quota_remaining: None,
            });
        }
        Ok(parsed)
    }

    /// Generate a one-time password and text it to the user.
    ///
    /// Quota and rate-limit failures are classified as for [`TextbeltClient::send_text`].
    pub async fn generate_otp(
        &self,
        request: &GenerateOtp,
    ) -> Result<GenerateOtpResponse, TextbeltError> {
        let url = self.endpoint(&["otp", "generate"])?;
        debug!(endpoint = %url, phone = %request.phone(), "generating otp");

        let params = crate::transport::encode_generate_otp_form(request, &self.key);
        let body = self.post(&url, params).await?;
        let reply = crate::transport::decode_generate_otp_json_response(&body)
            .map_err(|err| TextbeltError::Parse(Box::new(err)))?;
        accepted(reply)
    }

    /// Check a one-time password the user entered.
    ///
    /// A wrong code is not an error: inspect [`VerifyOtpResponse::is_valid_otp`].
    pub async fn verify_otp(&self, request: &VerifyOtp) -> Result<VerifyOtpResponse, TextbeltError> {
        let url = self.endpoint(&["otp", "verify"])?;
        debug!(endpoint = %url, "verifying otp");

        let query = crate::transport::encode_verify_otp_query(request, &self.key);
        let body = self.get(&url, query).await?;
        crate::transport::decode_verify_otp_json_response(&body)
            .map_err(|err| TextbeltError::Parse(Box::new(err)))
    }

    /// Send many messages in concurrent batches; see [`crate::bulk`].
    ///
    /// Batch calls are polled concurrently on the calling task.
    pub async fn send_bulk(&self, request: &BulkRequest) -> Result<BulkReport, BulkSendError> {
        self.send_bulk_with(request, &Cooperative).await
    }

    /// Like [`TextbeltClient::send_bulk`], with an explicit dispatch strategy such as
    /// [`crate::bulk::Threaded`].
    pub async fn send_bulk_with<E>(
        &self,
        request: &BulkRequest,
        executor: &E,
    ) -> Result<BulkReport, BulkSendError>
    where
        E: Executor + ?Sized,
    {
        let validated = request.validate()?;
        bulk::run(self, &validated, executor).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<String, TextbeltError> {
        let mut url = parse_base_url(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| ValidationError::InvalidUrl {
                input: self.base_url.clone(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    async fn post(&self, url: &str, params: Vec<(String, String)>) -> Result<String, TextbeltError> {
        let response = self
            .http
            .post_form(url, params)
            .await
            .map_err(TextbeltError::Transport)?;
        check_http_status(response)
    }

    async fn get(&self, url: &str, query: Vec<(String, String)>) -> Result<String, TextbeltError> {
        let response = self
            .http
            .get(url, query)
            .await
            .map_err(TextbeltError::Transport)?;
        check_http_status(response)
    }
}

fn check_http_status(response: HttpResponse) -> Result<String, TextbeltError> {
    if response.status == 429 {
        let retry_after = crate::transport::decode_retry_after(&response.body);
        return Err(TextbeltError::RateLimited { retry_after });
    }

    if !(200..=299).contains(&response.status) {
        let body = if response.body.trim().is_empty() {
            None
        } else {
            Some(response.body)
        };
        return Err(TextbeltError::HttpStatus {
            status: response.status,
            body,
        });
    }

    Ok(response.body)
}

/// Unwrap an accepted reply or classify the refusal.
///
/// Only an explicit `quotaRemaining: 0` means the quota is exhausted; a refusal that omits
/// the field is an ordinary API error.
fn accepted<T>(reply: Reply<T>) -> Result<T, TextbeltError> {
    match reply {
        Reply::Accepted(response) => Ok(response),
        Reply::Refused {
            error,
            quota_remaining: Some(0),
        } => Err(TextbeltError::QuotaExceeded {
            message: error.unwrap_or_else(|| "out of quota".to_owned()),
        }),
        Reply::Refused {
            error,
            quota_remaining,
        } => Err(TextbeltError::Api {
            message: error.unwrap_or_else(|| "request failed".to_owned()),
            quota_remaining,
        }),
    }
}
