//! Error classification and recovery hints.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Broad error kind, one per [`super::TranscriptionError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Unreachable,
    Timeout,
    Cancelled,
    ServiceRejected,
    MalformedResponse,
    Configuration,
    Io,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckConfiguration,
    IncreaseTimeout,
    ReduceInputSize,
    FixRequest,
    ContactSupport,
    None,
}
