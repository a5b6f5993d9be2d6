//! Presentation-side collaborators: saving, clipboard, thumbnails.
//!
//! The transcription core never depends on these; front ends implement
//! them for their platform and the CLI uses [`FileTranscriptSink`].

mod file;

pub use file::FileTranscriptSink;

use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::transcription::Media;

/// Persists transcript text somewhere the user can find it.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    /// Store `text` under `file_name`, returning where it ended up.
    async fn save(&self, file_name: &str, text: &str) -> Result<PathBuf>;
}

/// Host clipboard.
pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

/// Produces a still image for a media file. Purely cosmetic.
#[async_trait]
pub trait ThumbnailSource: Send + Sync {
    async fn thumbnail(&self, media: &Media) -> Result<Thumbnail>;
}

/// Encoded still image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl Thumbnail {
    /// `data:<mime>;base64,<payload>` for embedding in a web view.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}

/// `<media stem>_<YYYYMMDDHHMMSS>.txt`.
pub fn transcript_file_name(media: &Media, at: DateTime<Utc>) -> String {
    format!("{}_{}.txt", media.stem(), at.format("%Y%m%d%H%M%S"))
}

/// Save `text` for `media` under a timestamped name.
pub async fn save_transcript(
    sink: &dyn TranscriptSink,
    media: &Media,
    text: &str,
) -> Result<PathBuf> {
    let file_name = transcript_file_name(media, Utc::now());
    sink.save(&file_name, text).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_uses_stem_and_compact_timestamp() {
        let media = Media::from_bytes(vec![1], "holiday.mov", "video/quicktime");
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            transcript_file_name(&media, at),
            "holiday_20240309070501.txt"
        );
    }

    #[test]
    fn nameless_media_falls_back_to_video() {
        let media = Media::from_bytes(vec![1], ".mp4", "video/mp4");
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(transcript_file_name(&media, at), "video_20240101000000.txt");
    }

    #[test]
    fn thumbnail_renders_data_url() {
        let thumb = Thumbnail {
            data: vec![0xFF, 0xD8, 0xFF],
            mime_type: "image/jpeg".into(),
        };
        assert_eq!(thumb.to_data_url(), "data:image/jpeg;base64,/9j/");
    }
}
