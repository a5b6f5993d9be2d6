//! Convenience re-exports for common use.

pub use crate::config::ClientConfig;
pub use crate::error::{ErrorKind, Result, TranscriptionError};
pub use crate::job::{JobOutcome, JobState, TranscriptionJob};
pub use crate::transcription::{
    CallOptions, Media, ResponseFormat, Segment, TimestampGranularity, Transcriber,
    TranscriptionClient, TranscriptionRequest, TranscriptionResult, VerboseTranscription, Word,
};
pub use crate::util::retry::RetryPolicy;
pub use tokio_util::sync::CancellationToken;
