//! CLI entry point for vidscribe.

pub mod transcribe;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::transcription::{ResponseFormat, TimestampGranularity};

/// vidscribe CLI
#[derive(Parser, Debug)]
#[command(name = "vidscribe", version, about = "Transcribe audio and video files")]
pub struct Cli {
    /// Log request details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe a media file
    Transcribe(TranscribeArgs),
    /// Show the resolved configuration
    Config,
}

/// Arguments for `vidscribe transcribe`.
#[derive(Parser, Debug)]
pub struct TranscribeArgs {
    /// Audio or video file to transcribe
    pub file: PathBuf,

    /// Transcription endpoint (overrides config and VIDSCRIBE_ENDPOINT)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Reply format: text, json, srt, vtt, verbose_json
    #[arg(short, long, default_value = "json")]
    pub format: ResponseFormat,

    /// Two-letter language hint
    #[arg(short, long)]
    pub language: Option<String>,

    /// Text to bias recognition
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Sampling temperature (0.0 - 1.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Timestamp granularity (requires verbose_json); repeatable
    #[arg(short, long = "granularity")]
    pub granularities: Vec<TimestampGranularity>,

    /// Per-attempt timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Total attempts for retryable failures, the first included
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: u32,

    /// Save the transcript to a timestamped .txt file
    #[arg(short, long)]
    pub save: bool,

    /// Directory for --save (defaults to the downloads folder)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins when set.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter};

    let default_filter = if verbose {
        "warn,vidscribe=debug"
    } else {
        "warn,vidscribe=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
