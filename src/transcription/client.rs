//! HTTP transcription client.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::media::{container_for_mime, normalize_mime_type, recognize_container};
use super::multipart::build_transcription_multipart;
use super::parse::{extract_error_message, parse_success_body};
use super::service::Transcriber;
use super::types::{ResponseFormat, TranscriptionRequest, TranscriptionResult};
use crate::config::ClientConfig;
use crate::error::{Result, TranscriptionError};
use crate::util::timeout::{until_cancelled, with_timeout};

const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Replaces the client's configured timeout for this call.
    pub timeout: Option<Duration>,
    /// Cancelling the token resolves the call with [`TranscriptionError::Cancelled`].
    pub cancel: Option<CancellationToken>,
    /// Sent as the `Idempotency-Key` header.
    pub idempotency_key: Option<String>,
}

impl CallOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Client for a single transcription endpoint.
///
/// Every call is one independent POST: no retries, no caching, no history.
/// Clones share the configured endpoint, so [`configure`](Self::configure)
/// on one clone is visible to all of them; build separate clients for
/// separate endpoints.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    endpoint: Arc<RwLock<Url>>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Duration,
    http: reqwest::Client,
}

impl TranscriptionClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let endpoint = parse_endpoint(&config.endpoint)?;
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| {
                TranscriptionError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            endpoint: Arc::new(RwLock::new(endpoint)),
            api_key: config.api_key.filter(|key| !key.trim().is_empty()),
            model: config.model.filter(|model| !model.trim().is_empty()),
            timeout: config.timeout,
            http,
        })
    }

    /// A client for `endpoint` with every other setting at its default.
    pub fn for_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::builder().endpoint(endpoint).build())
    }

    /// Point all subsequent calls at `endpoint_url`. No network effect.
    ///
    /// Calls already in flight keep the endpoint they started with.
    pub fn configure(&self, endpoint_url: &str) -> Result<()> {
        let endpoint = parse_endpoint(endpoint_url)?;
        let mut current = self.endpoint.write().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(from = %*current, to = %endpoint, "Transcription endpoint configured");
        *current = endpoint;
        Ok(())
    }

    pub fn endpoint(&self) -> Url {
        self.endpoint
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Transcribe with the configured timeout and no cancellation.
    pub async fn transcribe(
        &self,
        request: &TranscriptionRequest<'_>,
    ) -> Result<TranscriptionResult> {
        self.transcribe_with(request, &CallOptions::default()).await
    }

    /// Transcribe with per-call timeout, cancellation and idempotency key.
    ///
    /// Validation runs first and never touches the network. The reply body is
    /// read in full before parsing, so a timeout or cancellation never exposes
    /// partial text.
    pub async fn transcribe_with(
        &self,
        request: &TranscriptionRequest<'_>,
        options: &CallOptions,
    ) -> Result<TranscriptionResult> {
        let mime_type = validate_request(request)?;

        let endpoint = self.endpoint();
        let timeout = options.timeout.unwrap_or(self.timeout);
        let exchange = with_timeout(
            timeout,
            self.exchange(
                endpoint,
                request,
                &mime_type,
                options.idempotency_key.as_deref(),
                timeout,
            ),
        );

        until_cancelled(options.cancel.as_ref(), exchange).await
    }

    async fn exchange(
        &self,
        endpoint: Url,
        request: &TranscriptionRequest<'_>,
        mime_type: &str,
        idempotency_key: Option<&str>,
        timeout: Duration,
    ) -> Result<TranscriptionResult> {
        let boundary = format!("vidscribe-{}", Uuid::new_v4().simple());
        let body =
            build_transcription_multipart(&boundary, request, self.model.as_deref(), mime_type);

        let content_type = HeaderValue::from_str(&format!(
            "multipart/form-data; boundary={boundary}"
        ))
        .map_err(|e| {
            TranscriptionError::Validation(format!("Failed to build multipart content-type: {e}"))
        })?;

        tracing::debug!(
            endpoint = %endpoint,
            bytes = request.media.len(),
            response_format = %request.response_format,
            "Sending transcription request"
        );

        let mut builder = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, content_type)
            .body(body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        if let Some(key) = idempotency_key {
            builder = builder.header(IDEMPOTENCY_KEY_HEADER, key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            let message =
                extract_error_message(&body, status.canonical_reason().unwrap_or("Request failed"));
            tracing::warn!(status = status.as_u16(), %message, "Transcription rejected");
            return Err(TranscriptionError::rejected(status.as_u16(), message));
        }

        let result = parse_success_body(request.response_format, status.as_u16(), &bytes)?;
        tracing::debug!(chars = result.text().len(), "Transcription complete");
        Ok(result)
    }
}

#[async_trait]
impl Transcriber for TranscriptionClient {
    async fn transcribe<'a>(
        &self,
        request: &TranscriptionRequest<'a>,
        options: &CallOptions,
    ) -> Result<TranscriptionResult> {
        self.transcribe_with(request, options).await
    }
}

/// Check `request` against the local constraints and pick the MIME type to send.
pub fn validate_request(request: &TranscriptionRequest<'_>) -> Result<String> {
    let container = recognize_container(request.media)?;

    if let Some(lang) = request.language.as_deref() {
        let lang = lang.trim();
        if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TranscriptionError::Validation(format!(
                "Language must be a two-letter code, got '{lang}'"
            )));
        }
    }

    if let Some(temperature) = request.temperature {
        if !temperature.is_finite() || !(0.0..=1.0).contains(&temperature) {
            return Err(TranscriptionError::validation(
                "Temperature must be between 0 and 1",
            ));
        }
    }

    if !request.timestamp_granularities.is_empty()
        && request.response_format != ResponseFormat::VerboseJson
    {
        return Err(TranscriptionError::Validation(format!(
            "Timestamp granularities require response format verbose_json, got {}",
            request.response_format
        )));
    }

    let declared = normalize_mime_type(request.media.mime_type())
        .filter(|mime| container_for_mime(mime).is_some());
    Ok(declared.unwrap_or_else(|| container.mime_type().to_string()))
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        TranscriptionError::Configuration(format!("Invalid endpoint URL '{raw}': {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TranscriptionError::Configuration(format!(
            "Endpoint must use http or https, got '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}

fn transport_error(error: reqwest::Error, timeout: Duration) -> TranscriptionError {
    if error.is_timeout() {
        TranscriptionError::Timeout(timeout.as_millis() as u64)
    } else {
        TranscriptionError::Unreachable(error.to_string())
    }
}
