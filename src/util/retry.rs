//! Retry with exponential backoff and jitter.
//!
//! Retrying is a caller concern: [`crate::TranscriptionClient`] issues exactly one
//! request per call, and [`crate::job::TranscriptionJob`] decides whether to go again.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::timeout::until_cancelled;
use crate::error::TranscriptionError;

/// How many times a user action is attempted, and how long to wait in between.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first included. Zero behaves like one.
    pub max_attempts: u32,
    /// Wait before the second attempt.
    pub initial_backoff: Duration,
    /// Ceiling for any single wait.
    pub max_backoff: Duration,
    /// Growth factor applied to the wait after each failed attempt.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// runs out of attempts, or `cancel` fires.
    ///
    /// Cancellation interrupts both an attempt in flight and a backoff wait,
    /// and resolves to [`TranscriptionError::Cancelled`].
    pub async fn execute<F, Fut, T>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
    ) -> Result<T, TranscriptionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TranscriptionError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;

        loop {
            let error = match until_cancelled(Some(cancel), operation()).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };
            if attempt >= max_attempts || !error.is_retryable() {
                return Err(error);
            }

            let wait = self.jittered(backoff);
            tracing::warn!(
                attempt,
                max_attempts,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Transcription attempt failed, retrying"
            );
            until_cancelled(Some(cancel), async {
                tokio::time::sleep(wait).await;
                Ok(())
            })
            .await?;

            backoff = self.grow(backoff);
            attempt += 1;
        }
    }

    /// 75% to 125% of `backoff`, capped at `max_backoff`.
    fn jittered(&self, backoff: Duration) -> Duration {
        scale(backoff, 0.75 + jitter() * 0.5).min(self.max_backoff)
    }

    fn grow(&self, backoff: Duration) -> Duration {
        scale(backoff, self.multiplier).min(self.max_backoff)
    }
}

fn scale(duration: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(duration.as_secs_f64() * factor).unwrap_or(duration)
}

/// Uniform-ish value in `[0, 1)` from the random bits of a v4 UUID.
fn jitter() -> f64 {
    (Uuid::new_v4().as_u128() % 10_000) as f64 / 10_000.0
}
