//! Transcription: request model, HTTP client, and reply parsing.

pub mod client;
pub mod media;
mod multipart;
mod parse;
pub mod service;
pub mod types;

pub use client::{validate_request, CallOptions, TranscriptionClient};
pub use media::{recognize_container, Container};
pub use service::Transcriber;
pub use types::*;
