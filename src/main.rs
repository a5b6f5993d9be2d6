//! vidscribe CLI binary entry point.

use vidscribe::cli::{init_tracing, Cli, Commands};
use vidscribe::TranscriptionError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Transcribe(args) => vidscribe::cli::transcribe::handle_transcribe(args).await,
        Commands::Config => vidscribe::cli::transcribe::handle_config(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Command failed");
        eprintln!("Error: {}", e.user_message());
        match &e {
            TranscriptionError::ServiceRejected { message, .. }
            | TranscriptionError::Validation(message)
            | TranscriptionError::Configuration(message) => eprintln!("  {message}"),
            _ => {}
        }
        std::process::exit(1);
    }
}
