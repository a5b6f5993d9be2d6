//! Deadlines and cancellation for in-flight work.
//!
//! Both helpers drop the inner future when they give up, so anything it had
//! buffered (a half-read reply body, say) goes with it.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::TranscriptionError;

/// Resolve to [`TranscriptionError::Timeout`] if `future` outlives `duration`.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, TranscriptionError>>,
) -> Result<T, TranscriptionError> {
    tokio::time::timeout(duration, future)
        .await
        .unwrap_or_else(|_| Err(TranscriptionError::Timeout(millis(duration))))
}

/// Resolve to [`TranscriptionError::Cancelled`] as soon as `cancel` fires.
///
/// An already-cancelled token wins without polling `future` at all. With no
/// token this is a plain await.
pub async fn until_cancelled<T>(
    cancel: Option<&CancellationToken>,
    future: impl Future<Output = Result<T, TranscriptionError>>,
) -> Result<T, TranscriptionError> {
    let Some(cancel) = cancel else {
        return future.await;
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("Transcription cancelled by caller");
            Err(TranscriptionError::Cancelled)
        }
        result = future => result,
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
