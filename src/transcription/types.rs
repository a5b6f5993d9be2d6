//! Transcription request/result types.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Wire format the service is asked to reply in.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    #[default]
    Json,
    Srt,
    Vtt,
    VerboseJson,
}

impl ResponseFormat {
    /// Whether the reply body is already the caller-visible string.
    pub fn is_plain_text(self) -> bool {
        matches!(self, Self::Text | Self::Srt | Self::Vtt)
    }
}

/// Timing detail requested alongside a `verbose_json` reply.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimestampGranularity {
    Word,
    Segment,
}

/// Binary media owned by the caller.
///
/// Requests only borrow it, so one `Media` can back any number of calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub(crate) data: Vec<u8>,
    pub(crate) file_name: String,
    pub(crate) mime_type: String,
}

impl Media {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One transcription call's worth of input.
///
/// # Example
/// ```
/// use vidscribe::transcription::{Media, ResponseFormat, TimestampGranularity, TranscriptionRequest};
///
/// let media = Media::from_bytes(b"RIFF....WAVEfmt ".to_vec(), "clip.wav", "audio/wav");
/// let request = TranscriptionRequest::builder()
///     .media(&media)
///     .language("en")
///     .response_format(ResponseFormat::VerboseJson)
///     .timestamp_granularities(vec![TimestampGranularity::Word])
///     .build();
/// assert_eq!(request.response_format, ResponseFormat::VerboseJson);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct TranscriptionRequest<'a> {
    pub media: &'a Media,
    /// Two-letter language code; absent means auto-detect.
    #[builder(into)]
    pub language: Option<String>,
    #[builder(into)]
    pub prompt: Option<String>,
    #[builder(default)]
    pub response_format: ResponseFormat,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: Option<f64>,
    /// Only valid together with [`ResponseFormat::VerboseJson`].
    #[builder(default)]
    pub timestamp_granularities: Vec<TimestampGranularity>,
}

impl<'a> TranscriptionRequest<'a> {
    /// A request with every option left at its default.
    pub fn new(media: &'a Media) -> Self {
        Self {
            media,
            language: None,
            prompt: None,
            response_format: ResponseFormat::default(),
            temperature: None,
            timestamp_granularities: Vec::new(),
        }
    }

    /// Requested granularities, deduplicated and in a stable order.
    pub fn granularities(&self) -> Vec<TimestampGranularity> {
        let mut granularities = self.timestamp_granularities.clone();
        granularities.sort();
        granularities.dedup();
        granularities
    }
}

/// A single recognised word with its timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// A contiguous span of the transcript with timing and confidence metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub seek_offset: u64,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
    pub token_ids: Vec<u32>,
    pub temperature: f64,
    pub avg_log_prob: f64,
    pub compression_ratio: f64,
    pub no_speech_prob: f64,
}

/// Body of a `verbose_json` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerboseTranscription {
    pub language: String,
    /// Media duration in seconds.
    pub duration: f64,
    pub text: String,
    /// Chronological.
    pub words: Vec<Word>,
    /// Chronological.
    pub segments: Vec<Segment>,
}

impl VerboseTranscription {
    /// The transcript rebuilt from the word list.
    pub fn words_text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.trim())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Normalised transcription output; the variant follows the request's [`ResponseFormat`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TranscriptionResult {
    /// `text`, `srt` and `vtt` replies.
    PlainText(String),
    /// `json` replies.
    Json(String),
    VerboseJson(VerboseTranscription),
}

impl TranscriptionResult {
    pub fn text(&self) -> &str {
        match self {
            Self::PlainText(text) | Self::Json(text) => text,
            Self::VerboseJson(verbose) => &verbose.text,
        }
    }

    /// True when the service recognised nothing but whitespace.
    ///
    /// This is not an error; callers decide how to surface it.
    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }

    pub fn words(&self) -> &[Word] {
        match self {
            Self::VerboseJson(verbose) => &verbose.words,
            _ => &[],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        match self {
            Self::VerboseJson(verbose) => &verbose.segments,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_format_names_match_service_fields() {
        assert_eq!(ResponseFormat::VerboseJson.to_string(), "verbose_json");
        assert_eq!(ResponseFormat::default(), ResponseFormat::Json);
        assert_eq!(
            "srt".parse::<ResponseFormat>().unwrap(),
            ResponseFormat::Srt
        );
        assert!(ResponseFormat::Vtt.is_plain_text());
        assert!(!ResponseFormat::Json.is_plain_text());
    }

    #[test]
    fn granularities_are_deduplicated() {
        let media = Media::from_bytes(vec![1], "a.mp3", "audio/mpeg");
        let mut request = TranscriptionRequest::new(&media);
        request.timestamp_granularities = vec![
            TimestampGranularity::Segment,
            TimestampGranularity::Word,
            TimestampGranularity::Segment,
        ];
        assert_eq!(
            request.granularities(),
            vec![TimestampGranularity::Word, TimestampGranularity::Segment]
        );
    }

    #[test]
    fn words_text_joins_in_order() {
        let verbose = VerboseTranscription {
            language: "en".into(),
            duration: 1.0,
            text: " hello world".into(),
            words: vec![
                Word {
                    text: "hello".into(),
                    start_time: 0.0,
                    end_time: 0.4,
                },
                Word {
                    text: " world".into(),
                    start_time: 0.4,
                    end_time: 0.9,
                },
            ],
            segments: vec![],
        };
        assert_eq!(verbose.words_text(), "hello world");
        let result = TranscriptionResult::VerboseJson(verbose);
        assert_eq!(result.words().len(), 2);
        assert!(result.segments().is_empty());
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        assert!(TranscriptionResult::PlainText("  \n".into()).is_empty());
        assert!(!TranscriptionResult::Json("hi".into()).is_empty());
    }
}
