//! Error types for safety-car analysis.
//!
//! Errors fall into two groups:
//!
//! - **Fatal**: the data source could not deliver the session, a file could not
//!   be read, or configuration is invalid. These abort the current run.
//! - **Recoverable**: data-quality problems with a single lap or a single
//!   window. The analyzer excludes the offending item, counts it and carries on.
//!
//! An empty sample for an average or delta query is not an error at all; those
//! queries return `None`.
//!
//! ```rust
//! use safetycar::AnalysisError;
//!
//! let error = AnalysisError::provider_failure("timing feed unavailable");
//! assert!(error.is_fatal());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

/// Main error type for analysis operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("Session data provider failed: {reason}")]
    Provider {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Session file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Invalid analysis configuration: {reason}")]
    Config { reason: String },

    #[error("Invalid session at {track_name}: {reason}")]
    InvalidSession { track_name: String, reason: String },

    #[error("Malformed safety-car window: end {end:?} does not follow start {start:?}")]
    MalformedWindow { start: Duration, end: Duration },

    #[error("Lap {lap_number} is missing its {field}")]
    MissingData { lap_number: u32, field: &'static str },

    #[error("Lap {lap_number} rejected: {reason}")]
    InvalidLap { lap_number: u32, reason: LapRejection },
}

/// Reason a raw lap was refused at the ingestion boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LapRejection {
    #[error("no lap duration recorded")]
    MissingDuration,

    #[error("lap duration {0}s is not positive")]
    NonPositiveDuration(f64),

    #[error("lap duration is not a finite number")]
    NonFiniteDuration,

    #[error("lap number must be at least 1")]
    InvalidLapNumber,

    #[error("lap number already recorded for this driver")]
    DuplicateLapNumber,
}

impl AnalysisError {
    /// Returns whether this error must abort the current analysis run.
    pub fn is_fatal(&self) -> bool {
        match self {
            AnalysisError::Provider { .. } => true,
            AnalysisError::File { .. } => true,
            AnalysisError::Parse { .. } => true,
            AnalysisError::Config { .. } => true,
            AnalysisError::InvalidSession { .. } => true,
            AnalysisError::MalformedWindow { .. } => false,
            AnalysisError::MissingData { .. } => false,
            AnalysisError::InvalidLap { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            AnalysisError::Provider { .. } => vec![
                "Check the timing data source is reachable",
                "Verify the season, event and session identifiers",
                "Retry once the provider has published the session",
            ],
            AnalysisError::File { .. } => vec![
                "Check the session file exists and is readable",
                "Check file permissions",
            ],
            AnalysisError::Parse { .. } => vec![
                "Check the session file is valid YAML",
                "Verify timestamps are non-negative seconds",
            ],
            AnalysisError::Config { .. } => vec![
                "Check marker strings are not empty",
                "Use a delta window of at least one lap",
                "List each driver code only once",
            ],
            AnalysisError::InvalidSession { .. } => vec![
                "Check the session reports a positive lap count",
            ],
            AnalysisError::MalformedWindow { .. } => vec![
                "Check race-control messages are ordered by time",
                "Try the keyed pairing strategy for this message vocabulary",
            ],
            AnalysisError::MissingData { .. } => vec![
                "Lap is excluded from aggregation; no action required",
            ],
            AnalysisError::InvalidLap { .. } => vec![
                "Lap is excluded from aggregation; no action required",
                "Inspect the provider's raw lap rows for this driver",
            ],
        }
    }

    /// Helper constructor for provider failures.
    pub fn provider_failure(reason: impl Into<String>) -> Self {
        AnalysisError::Provider { reason: reason.into(), source: None }
    }

    /// Helper constructor for provider failures with source.
    pub fn provider_failure_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        AnalysisError::Provider { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        AnalysisError::File { path, source }
    }

    /// Helper constructor for parse errors.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        AnalysisError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for sessions that cannot be analysed.
    pub fn invalid_session(track_name: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidSession { track_name: track_name.into(), reason: reason.into() }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(reason: impl Into<String>) -> Self {
        AnalysisError::Config { reason: reason.into() }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_yaml_ng::Error> for AnalysisError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        AnalysisError::Parse { context: "YAML document".to_string(), details: err.to_string() }
    }
}
