//! Media acquisition and container recognition.

use std::path::Path;

use strum::Display;

use super::types::Media;
use crate::error::{Result, TranscriptionError};

const DEFAULT_FILE_NAME: &str = "video.mp4";
const DEFAULT_MIME_TYPE: &str = "video/mp4";

/// Audio/video containers the transcription service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Container {
    Mp3,
    Mp4,
    M4a,
    Wav,
    Webm,
    Ogg,
    Flac,
    QuickTime,
    Matroska,
}

impl Container {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
            Self::M4a => "m4a",
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::QuickTime => "mov",
            Self::Matroska => "mkv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Mp4 => "video/mp4",
            Self::M4a => "audio/mp4",
            Self::Wav => "audio/wav",
            Self::Webm => "video/webm",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::QuickTime => "video/quicktime",
            Self::Matroska => "video/x-matroska",
        }
    }
}

impl Media {
    /// Wrap bytes the caller already holds.
    ///
    /// Empty `file_name`/`mime_type` fall back to `video.mp4` / `video/mp4`.
    pub fn from_bytes(
        data: Vec<u8>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_type.into();
        Self {
            data,
            file_name: if file_name.trim().is_empty() {
                DEFAULT_FILE_NAME.to_string()
            } else {
                file_name
            },
            mime_type: if mime_type.trim().is_empty() {
                DEFAULT_MIME_TYPE.to_string()
            } else {
                mime_type
            },
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(container_for_extension)
            .map(Container::mime_type)
            .unwrap_or("application/octet-stream");

        tracing::debug!(path = %path.display(), bytes = data.len(), mime_type, "Loaded media");
        Ok(Self::from_bytes(data, file_name, mime_type))
    }

    /// File name without its extension, `video` when there is nothing left.
    pub fn stem(&self) -> &str {
        let stem = match self.file_name.rsplit_once('.') {
            Some((stem, _)) => stem,
            None => &self.file_name,
        };
        if stem.trim().is_empty() {
            "video"
        } else {
            stem
        }
    }
}

pub(crate) fn normalize_mime_type(mime_type: &str) -> Option<String> {
    let normalized = mime_type
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default();
    if normalized.is_empty() {
        return None;
    }
    Some(normalized.to_ascii_lowercase())
}

pub(crate) fn container_for_mime(mime_type: &str) -> Option<Container> {
    match mime_type {
        "audio/mpeg" | "audio/mp3" | "audio/mpga" | "video/mpeg" => Some(Container::Mp3),
        "video/mp4" => Some(Container::Mp4),
        "audio/mp4" | "audio/x-m4a" | "audio/m4a" => Some(Container::M4a),
        "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Some(Container::Wav),
        "audio/webm" | "video/webm" => Some(Container::Webm),
        "audio/ogg" | "video/ogg" | "application/ogg" => Some(Container::Ogg),
        "audio/flac" | "audio/x-flac" => Some(Container::Flac),
        "video/quicktime" => Some(Container::QuickTime),
        "video/x-matroska" | "audio/x-matroska" => Some(Container::Matroska),
        _ => None,
    }
}

pub(crate) fn container_for_extension(extension: &str) -> Option<Container> {
    match extension.to_ascii_lowercase().as_str() {
        "mp3" | "mpeg" | "mpga" => Some(Container::Mp3),
        "mp4" => Some(Container::Mp4),
        "m4a" => Some(Container::M4a),
        "wav" => Some(Container::Wav),
        "webm" => Some(Container::Webm),
        "ogg" | "oga" | "opus" => Some(Container::Ogg),
        "flac" => Some(Container::Flac),
        "mov" => Some(Container::QuickTime),
        "mkv" => Some(Container::Matroska),
        _ => None,
    }
}

/// Identify a container from its leading bytes.
pub(crate) fn sniff_container(data: &[u8]) -> Option<Container> {
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        return Some(match &data[8..12] {
            b"qt  " => Container::QuickTime,
            b"M4A " | b"M4B " => Container::M4a,
            _ => Container::Mp4,
        });
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WAVE" {
        return Some(Container::Wav);
    }
    if data.starts_with(b"OggS") {
        return Some(Container::Ogg);
    }
    if data.starts_with(b"fLaC") {
        return Some(Container::Flac);
    }
    if data.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        let head = &data[..data.len().min(64)];
        let is_webm = head.windows(4).any(|window| window == b"webm");
        return Some(if is_webm {
            Container::Webm
        } else {
            Container::Matroska
        });
    }
    if data.starts_with(b"ID3") || (data.len() >= 2 && data[0] == 0xFF && data[1] & 0xE0 == 0xE0)
    {
        return Some(Container::Mp3);
    }
    None
}

fn is_generic_mime(mime_type: &str) -> bool {
    matches!(
        mime_type,
        "application/octet-stream" | "binary/octet-stream" | "application/unknown"
    )
}

/// Decide which container `media` holds, or reject it.
///
/// A declared media MIME type wins. A missing or generic one falls back to
/// byte sniffing, then to the file extension. Anything else is rejected.
pub fn recognize_container(media: &Media) -> Result<Container> {
    if media.data.is_empty() {
        return Err(TranscriptionError::validation("Media payload cannot be empty"));
    }

    let mime = normalize_mime_type(&media.mime_type);
    if let Some(container) = mime.as_deref().and_then(container_for_mime) {
        return Ok(container);
    }

    match mime.as_deref() {
        None => {}
        Some(generic) if is_generic_mime(generic) => {}
        Some(other) => {
            return Err(TranscriptionError::Validation(format!(
                "Unsupported media type: {other}"
            )))
        }
    }

    sniff_container(&media.data)
        .or_else(|| {
            media
                .file_name
                .rsplit_once('.')
                .and_then(|(_, ext)| container_for_extension(ext))
        })
        .ok_or_else(|| {
            TranscriptionError::validation("Media is not a recognised audio or video container")
        })
}
