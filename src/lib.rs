//! vidscribe: typed client for remote speech-to-text services.
//!
//! Submits audio/video to a transcription endpoint as `multipart/form-data`
//! and returns the reply as a [`TranscriptionResult`] keyed by the requested
//! [`ResponseFormat`], or a typed [`TranscriptionError`].
//!
//! # Quick Start
//!
//! ```no_run
//! use vidscribe::prelude::*;
//!
//! # async fn example() -> vidscribe::error::Result<()> {
//! let client = TranscriptionClient::new(ClientConfig::from_env()?)?;
//! let media = Media::from_path("talk.mp4").await?;
//! let request = TranscriptionRequest::builder()
//!     .media(&media)
//!     .language("en")
//!     .build();
//! let result = client.transcribe(&request).await?;
//! println!("{}", result.text());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod job;
pub mod output;
pub mod prelude;
pub mod transcription;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Result, TranscriptionError};
pub use transcription::{ResponseFormat, TranscriptionClient, TranscriptionResult};
