//! Reply parsing, dispatched on the format the caller asked for.

use serde::Deserialize;
use serde_json::Value;

use super::types::{ResponseFormat, Segment, TranscriptionResult, VerboseTranscription, Word};
use crate::error::{Result, TranscriptionError};

#[derive(Debug, Deserialize)]
struct JsonReply {
    text: Option<String>,
    /// Legacy envelope field.
    transcription: Option<String>,
    status: Option<String>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct VerboseReply {
    language: Option<String>,
    duration: Option<f64>,
    text: String,
    // Servers send `null` as well as omitting the key when timings weren't requested.
    words: Option<Vec<VerboseWord>>,
    segments: Option<Vec<VerboseSegment>>,
}

#[derive(Debug, Deserialize)]
struct VerboseWord {
    word: String,
    start: f64,
    end: f64,
}

#[derive(Debug, Deserialize)]
struct VerboseSegment {
    id: u32,
    #[serde(default)]
    seek: u64,
    start: f64,
    end: f64,
    text: String,
    #[serde(default)]
    tokens: Vec<u32>,
    #[serde(default)]
    temperature: f64,
    #[serde(default)]
    avg_logprob: f64,
    #[serde(default)]
    compression_ratio: f64,
    #[serde(default)]
    no_speech_prob: f64,
}

/// Turn a 2xx body into the result variant selected by `format`.
pub(crate) fn parse_success_body(
    format: ResponseFormat,
    status: u16,
    body: &[u8],
) -> Result<TranscriptionResult> {
    let body = std::str::from_utf8(body).map_err(|e| {
        TranscriptionError::MalformedResponse(format!("Reply is not valid UTF-8: {e}"))
    })?;

    match format {
        ResponseFormat::Text | ResponseFormat::Srt | ResponseFormat::Vtt => {
            Ok(TranscriptionResult::PlainText(body.to_string()))
        }
        ResponseFormat::Json => parse_json(status, body),
        ResponseFormat::VerboseJson => parse_verbose_json(body),
    }
}

fn parse_json(status: u16, body: &str) -> Result<TranscriptionResult> {
    let reply: JsonReply = serde_json::from_str(body).map_err(|e| {
        TranscriptionError::MalformedResponse(format!("Expected a JSON transcription: {e}"))
    })?;

    if reply.status.as_deref() == Some("error") {
        let message = reply
            .error
            .as_ref()
            .and_then(message_from_value)
            .unwrap_or_else(|| "Transcription failed".to_string());
        return Err(TranscriptionError::rejected(status, message));
    }

    reply
        .text
        .or(reply.transcription)
        .map(TranscriptionResult::Json).ok_or_else(|| {
        TranscriptionError::MalformedResponse("JSON reply has no `text` field".to_string())
    })
}

fn parse_verbose_json(body: &str) -> Result<TranscriptionResult> {
    let reply: VerboseReply = serde_json::from_str(body).map_err(|e| {
        TranscriptionError::MalformedResponse(format!("Expected a verbose JSON transcription: {e}"))
    })?;

    Ok(TranscriptionResult::VerboseJson(VerboseTranscription {
        language: reply.language.unwrap_or_default(),
        duration: reply.duration.unwrap_or_default(),
        text: reply.text,
        words: reply
            .words
            .unwrap_or_default()
            .into_iter()
            .map(|word| Word {
                text: word.word,
                start_time: word.start,
                end_time: word.end,
            })
            .collect(),
        segments: reply
            .segments
            .unwrap_or_default()
            .into_iter()
            .map(|segment| Segment {
                id: segment.id,
                seek_offset: segment.seek,
                start_time: segment.start,
                end_time: segment.end,
                text: segment.text,
                token_ids: segment.tokens,
                temperature: segment.temperature,
                avg_log_prob: segment.avg_logprob,
                compression_ratio: segment.compression_ratio,
                no_speech_prob: segment.no_speech_prob,
            })
            .collect(),
    }))
}

/// Best-effort human-readable message from an error body.
///
/// Structured bodies are searched for the usual message fields; anything
/// else is returned trimmed, and an empty body falls back to `reason`.
pub(crate) fn extract_error_message(body: &str, reason: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return reason.to_string();
    }

    serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|value| {
            ["error", "message", "detail"]
                .iter()
                .find_map(|key| value.get(key).and_then(message_from_value))
        })
        .unwrap_or_else(|| trimmed.to_string())
}

fn message_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(message) if !message.trim().is_empty() => Some(message.trim().to_string()),
        Value::Object(map) => map.get("message").and_then(message_from_value),
        _ => None,
    }
}
