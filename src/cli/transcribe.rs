//! CLI command handlers for transcribe and config.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::TranscribeArgs;
use crate::config::{default_config_path, ClientConfig};
use crate::error::TranscriptionError;
use crate::job::{JobOutcome, TranscriptionJob};
use crate::output::{save_transcript, FileTranscriptSink};
use crate::transcription::{Media, TranscriptionClient, TranscriptionRequest, TranscriptionResult};
use crate::util::retry::RetryPolicy;

/// Handle `vidscribe transcribe <file>`.
pub async fn handle_transcribe(args: TranscribeArgs) -> Result<(), TranscriptionError> {
    let mut config = ClientConfig::load()?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    let client = TranscriptionClient::new(config)?;
    let media = Media::from_path(&args.file).await?;
    let request = TranscriptionRequest {
        media: &media,
        language: args.language,
        prompt: args.prompt,
        response_format: args.format,
        temperature: args.temperature,
        timestamp_granularities: args.granularities,
    };

    let mut job = TranscriptionJob::new(client).with_retry_policy(RetryPolicy {
        max_attempts: args.attempts,
        ..RetryPolicy::default()
    });

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    eprintln!("Transcribing {} ...", media.file_name());
    let outcome = job.run(&request, &cancel).await?;

    let text = match &outcome {
        JobOutcome::NoSpeech => {
            eprintln!("{}", JobOutcome::NO_SPEECH_MESSAGE);
            return Ok(());
        }
        JobOutcome::Transcript { text, result } => {
            print_result(text, result);
            text
        }
    };

    if args.save {
        let sink = match args.out_dir {
            Some(dir) => FileTranscriptSink::new(dir),
            None => FileTranscriptSink::downloads(),
        };
        let path = save_transcript(&sink, &media, text).await?;
        eprintln!("Saved to {}", path.display());
    }

    Ok(())
}

fn print_result(text: &str, result: &TranscriptionResult) {
    let segments = result.segments();
    if segments.is_empty() {
        println!("{text}");
        return;
    }
    for segment in segments {
        println!(
            "[{:>8.2} -> {:>8.2}] {}",
            segment.start_time,
            segment.end_time,
            segment.text.trim()
        );
    }
}

/// Handle `vidscribe config`.
pub fn handle_config() -> Result<(), TranscriptionError> {
    let config = ClientConfig::load()?;
    println!("config file: {}", default_config_path().display());
    println!("endpoint:    {}", config.endpoint);
    println!(
        "api key:     {}",
        config.redacted_api_key().unwrap_or_else(|| "(none)".to_string())
    );
    println!(
        "model:       {}",
        config.model.as_deref().unwrap_or("(none)")
    );
    println!("timeout:     {}s", config.timeout.as_secs());
    Ok(())
}
