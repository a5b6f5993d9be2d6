//! Shared test helpers and mock transcriber.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use vidscribe::error::TranscriptionError;
use vidscribe::transcription::{
    CallOptions, Media, Transcriber, TranscriptionClient, TranscriptionRequest,
    TranscriptionResult,
};

pub fn wav_media() -> Media {
    Media::from_bytes(
        b"RIFF\x24\0\0\0WAVEfmt fake-pcm".to_vec(),
        "clip.wav",
        "audio/wav",
    )
}

pub fn mp4_media() -> Media {
    let mut data = vec![0, 0, 0, 0x18];
    data.extend_from_slice(b"ftypisom");
    data.extend_from_slice(&[0; 16]);
    Media::from_bytes(data, "holiday.mp4", "video/mp4")
}

/// Client pointed at `path` on a mock server.
pub fn client_for(server_uri: &str, path: &str) -> TranscriptionClient {
    TranscriptionClient::for_endpoint(format!("{server_uri}{path}")).unwrap()
}

/// A transcriber that replays queued results and records what it saw.
pub struct MockTranscriber {
    results: Mutex<Vec<Result<TranscriptionResult, TranscriptionError>>>,
    calls: AtomicUsize,
    keys: Mutex<Vec<Option<String>>>,
    delay: Option<Duration>,
}

impl MockTranscriber {
    pub fn new(results: Vec<Result<TranscriptionResult, TranscriptionError>>) -> Self {
        Self {
            results: Mutex::new(results),
            calls: AtomicUsize::new(0),
            keys: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<Option<String>> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe<'a>(
        &self,
        _request: &TranscriptionRequest<'a>,
        options: &CallOptions,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys
            .lock()
            .unwrap()
            .push(options.idempotency_key.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            return Err(TranscriptionError::MalformedResponse(
                "no queued result".to_string(),
            ));
        }
        results.remove(0)
    }
}
