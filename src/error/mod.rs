//! Error types for vidscribe.

pub mod unified;

pub use unified::{ErrorKind, RecoverySuggestion};

use thiserror::Error;

/// Every way a transcription call (or the plumbing around it) can fail.
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The request was malformed; detected before any network I/O.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// No response was received from the endpoint.
    #[error("Transcription service unreachable: {0}")]
    Unreachable(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Transcription cancelled")]
    Cancelled,

    /// The endpoint answered but refused the request.
    #[error("Service rejected request (status {status}): {message}")]
    ServiceRejected { status: u16, message: String },

    /// The endpoint answered with a body that does not match the requested format.
    #[error("Malformed transcription response: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscriptionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::ServiceRejected {
            status,
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unreachable(_) => ErrorKind::Unreachable,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::ServiceRejected { .. } => ErrorKind::ServiceRejected,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether a caller-side retry has a chance of succeeding.
    ///
    /// The client itself never retries; this only informs [`crate::util::retry::RetryPolicy`].
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable(_) | Self::Timeout(_) => true,
            Self::ServiceRejected { status, .. } => {
                matches!(status, 408 | 429 | 500..=599)
            }
            _ => false,
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            Self::Validation(_) => RecoverySuggestion::FixRequest,
            Self::Configuration(_) => RecoverySuggestion::CheckConfiguration,
            Self::Timeout(_) => RecoverySuggestion::IncreaseTimeout,
            Self::Cancelled => RecoverySuggestion::None,
            Self::ServiceRejected { status: 413, .. } => RecoverySuggestion::ReduceInputSize,
            Self::ServiceRejected { status: 401 | 403, .. } => {
                RecoverySuggestion::CheckCredentials
            }
            err if err.is_retryable() => RecoverySuggestion::RetryWithBackoff,
            _ => RecoverySuggestion::ContactSupport,
        }
    }

    /// One short sentence suitable for showing to an end user.
    ///
    /// Never contains transport internals.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Validation => "This file cannot be transcribed with the chosen options.",
            ErrorKind::Unreachable => "Failed to connect to server or process video.",
            ErrorKind::Timeout => "The transcription service took too long to respond.",
            ErrorKind::Cancelled => "Transcription was cancelled.",
            ErrorKind::ServiceRejected => "Transcription failed.",
            ErrorKind::MalformedResponse => "The transcription service sent an unreadable reply.",
            ErrorKind::Configuration => "The transcription service is not configured correctly.",
            ErrorKind::Io => "Failed to read or save the file.",
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TranscriptionError>;
