use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::TranscriptSink;
use crate::error::{Result, TranscriptionError};

/// Writes transcripts as UTF-8 files into one directory.
#[derive(Debug, Clone)]
pub struct FileTranscriptSink {
    dir: PathBuf,
}

impl FileTranscriptSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The user's downloads folder, else their home directory, else the working directory.
    pub fn downloads() -> Self {
        let dir = directories::UserDirs::new()
            .map(|dirs| {
                dirs.download_dir()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| dirs.home_dir().to_path_buf())
            })
            .unwrap_or_else(|| PathBuf::from("."));
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl TranscriptSink for FileTranscriptSink {
    async fn save(&self, file_name: &str, text: &str) -> Result<PathBuf> {
        let is_plain_name = !file_name.is_empty()
            && Path::new(file_name).file_name().and_then(|n| n.to_str()) == Some(file_name);
        if !is_plain_name {
            return Err(TranscriptionError::Validation(format!(
                "Transcript file name must not contain a path: '{file_name}'"
            )));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, text.as_bytes()).await?;
        tracing::info!(path = %path.display(), "Transcript saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_into_directory_creating_it() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileTranscriptSink::new(dir.path().join("nested"));

        let path = sink.save("clip_20240101000000.txt", "hello").await.unwrap();

        assert_eq!(path, dir.path().join("nested/clip_20240101000000.txt"));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileTranscriptSink::new(dir.path());

        for name in ["../escape.txt", "a/b.txt", "", ".."] {
            let err = sink.save(name, "x").await.unwrap_err();
            assert!(matches!(err, TranscriptionError::Validation(_)), "{name}");
        }
    }
}
