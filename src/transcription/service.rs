//! Transcription service trait.

use async_trait::async_trait;

use super::client::CallOptions;
use super::types::{TranscriptionRequest, TranscriptionResult};
use crate::error::TranscriptionError;

/// Anything that can turn a [`TranscriptionRequest`] into a [`TranscriptionResult`].
///
/// [`crate::TranscriptionClient`] is the HTTP implementation; tests and
/// alternative backends can supply their own.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe<'a>(
        &self,
        request: &TranscriptionRequest<'a>,
        options: &CallOptions,
    ) -> Result<TranscriptionResult, TranscriptionError>;
}
