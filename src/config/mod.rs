//! Configuration system (layered: code > env > config file > defaults).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bon::Builder;
use serde::Deserialize;

use crate::error::{Result, TranscriptionError};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const ENV_ENDPOINT: &str = "VIDSCRIBE_ENDPOINT";
const ENV_API_KEY: &str = "VIDSCRIBE_API_KEY";
const ENV_MODEL: &str = "VIDSCRIBE_MODEL";
const ENV_TIMEOUT_SECS: &str = "VIDSCRIBE_TIMEOUT_SECS";

/// Settings for one [`crate::TranscriptionClient`].
///
/// # Example
/// ```
/// use std::time::Duration;
/// use vidscribe::config::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .endpoint("https://stt.example.com/v1/audio/transcriptions")
///     .model("whisper-1")
///     .timeout(Duration::from_secs(10))
///     .build();
/// assert_eq!(config.model.as_deref(), Some("whisper-1"));
/// ```
#[derive(Clone, Builder)]
pub struct ClientConfig {
    /// Absolute `http`/`https` URL requests are POSTed to.
    #[builder(into, default = DEFAULT_ENDPOINT.to_string())]
    pub endpoint: String,
    /// Sent as a bearer token when present.
    #[builder(into)]
    pub api_key: Option<String>,
    /// Sent as the `model` form field when present.
    #[builder(into)]
    pub model: Option<String>,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.redacted_api_key())
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// On-disk shape of `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Defaults overlaid with environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Defaults, then `~/.vidscribe/config.toml` if it exists, then the environment.
    pub fn load() -> Result<Self> {
        let path = default_config_path();
        let base = if path.is_file() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        base.with_env()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TranscriptionError::Configuration(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(contents)
            .map_err(|e| TranscriptionError::Configuration(format!("Invalid config file: {e}")))?;
        Ok(Self::default().merge_file(file))
    }

    fn merge_file(mut self, file: FileConfig) -> Self {
        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if file.api_key.is_some() {
            self.api_key = file.api_key;
        }
        if file.model.is_some() {
            self.model = file.model;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Overlay `VIDSCRIBE_*` environment variables.
    pub fn with_env(mut self) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        if let Some(endpoint) = non_empty_env(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(key) = non_empty_env(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty_env(ENV_MODEL) {
            self.model = Some(model);
        }
        if let Some(raw) = non_empty_env(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                TranscriptionError::Configuration(format!(
                    "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// The API key with everything but its last four characters hidden.
    pub fn redacted_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| {
            let visible: String = key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            if key.chars().count() <= 4 {
                "****".to_string()
            } else {
                format!("****{visible}")
            }
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// `~/.vidscribe/config.toml`.
pub fn default_config_path() -> PathBuf {
    default_vidscribe_dir().join("config.toml")
}

fn default_vidscribe_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".vidscribe"))
        .unwrap_or_else(|| PathBuf::from(".vidscribe"))
}
