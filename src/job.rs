//! One user action ("transcribe this file") as a single job.
//!
//! The client makes exactly one request per call; the job layers the
//! caller-side policy on top: retries, cancellation, a busy flag that always
//! resolves, and the "no speech detected" distinction.

use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::{ErrorKind, Result};
use crate::transcription::{CallOptions, Transcriber, TranscriptionRequest, TranscriptionResult};
use crate::util::retry::RetryPolicy;

/// Where a job currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    /// A request is in flight.
    Busy,
    Done,
    NoSpeech,
    Failed(ErrorKind),
}

impl JobState {
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Busy)
    }
}

/// Successful job result.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Transcript {
        /// Trimmed caller-visible text.
        text: String,
        result: TranscriptionResult,
    },
    /// The service answered but recognised nothing.
    NoSpeech,
}

impl JobOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Transcript { text, .. } => Some(text),
            Self::NoSpeech => None,
        }
    }

    /// Sentence to show for [`JobOutcome::NoSpeech`].
    pub const NO_SPEECH_MESSAGE: &'static str = "Cannot find any meaningful transcription";
}

/// Runs transcriptions through a [`Transcriber`] with retry and cancellation.
pub struct TranscriptionJob<T> {
    transcriber: T,
    retry_policy: RetryPolicy,
    timeout: Option<Duration>,
    state: watch::Sender<JobState>,
}

impl<T: Transcriber> TranscriptionJob<T> {
    pub fn new(transcriber: T) -> Self {
        let (state, _) = watch::channel(JobState::Idle);
        Self {
            transcriber,
            retry_policy: RetryPolicy::none(),
            timeout: None,
            state,
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Per-attempt timeout; the transcriber's own default applies otherwise.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn transcriber(&self) -> &T {
        &self.transcriber
    }

    pub fn state(&self) -> JobState {
        *self.state.borrow()
    }

    /// Watch state transitions (e.g. to drive a spinner).
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.state.subscribe()
    }

    /// Transcribe `request`, retrying per policy until success, a
    /// non-retryable error, exhaustion, or `cancel` firing.
    ///
    /// Every attempt carries the same idempotency key. The state leaves
    /// [`JobState::Busy`] even if this future is dropped mid-flight.
    ///
    /// A job tracks one action at a time, hence `&mut self`; run independent
    /// actions on separate jobs.
    pub async fn run(
        &mut self,
        request: &TranscriptionRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<JobOutcome> {
        let key = idempotency_key(request);
        let options = CallOptions {
            timeout: self.timeout,
            cancel: Some(cancel.clone()),
            idempotency_key: Some(key.clone()),
        };

        let mut guard = BusyGuard::enter(&self.state);
        tracing::info!(job = %&key[..12], file = request.media.file_name(), "Transcription started");

        let result = self
            .retry_policy
            .execute(cancel, || self.transcriber.transcribe(request, &options))
            .await;

        let outcome = match result {
            Ok(result) if result.is_empty() => JobOutcome::NoSpeech,
            Ok(result) => JobOutcome::Transcript {
                text: result.text().trim().to_string(),
                result,
            },
            Err(e) => {
                tracing::warn!(job = %&key[..12], error = %e, "Transcription failed");
                guard.finish(JobState::Failed(e.kind()));
                return Err(e);
            }
        };

        let state = match outcome {
            JobOutcome::NoSpeech => JobState::NoSpeech,
            JobOutcome::Transcript { .. } => JobState::Done,
        };
        tracing::info!(job = %&key[..12], ?state, "Transcription finished");
        guard.finish(state);
        Ok(outcome)
    }
}

/// Holds the job in [`JobState::Busy`]; reverts to `Failed(Cancelled)` if dropped unfinished.
struct BusyGuard<'a> {
    state: &'a watch::Sender<JobState>,
    finished: bool,
}

impl<'a> BusyGuard<'a> {
    fn enter(state: &'a watch::Sender<JobState>) -> Self {
        state.send_replace(JobState::Busy);
        Self {
            state,
            finished: false,
        }
    }

    fn finish(&mut self, state: JobState) {
        self.state.send_replace(state);
        self.finished = true;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state
                .send_replace(JobState::Failed(ErrorKind::Cancelled));
        }
    }
}

/// Stable key for one user action: SHA-256 over the media and every request option.
pub fn idempotency_key(request: &TranscriptionRequest<'_>) -> String {
    fn field(hasher: &mut Sha256, bytes: &[u8]) {
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }

    let mut hasher = Sha256::new();
    field(&mut hasher, request.media.data());
    field(&mut hasher, request.media.file_name().as_bytes());
    field(&mut hasher, request.response_format.to_string().as_bytes());
    field(
        &mut hasher,
        request.language.as_deref().unwrap_or_default().as_bytes(),
    );
    field(
        &mut hasher,
        request.prompt.as_deref().unwrap_or_default().as_bytes(),
    );
    field(
        &mut hasher,
        &request
            .temperature
            .map(f64::to_bits)
            .unwrap_or(u64::MAX)
            .to_le_bytes(),
    );
    for granularity in request.granularities() {
        field(&mut hasher, granularity.to_string().as_bytes());
    }

    format!("{:x}", hasher.finalize())
}
