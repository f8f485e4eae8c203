//! Error handling module for archdesk
//!
//! `ArchDeskError` covers configuration and I/O failures at the edges.
//! `InstallError` is the taxonomy for a single install attempt; the resolver
//! turns every one of them into an `InstallOutcome` instead of propagating.

use thiserror::Error;

use crate::types::AurHelper;

/// Main error type for archdesk
#[derive(Error, Debug)]
pub enum ArchDeskError {
    /// IO errors (config file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (unusable file contents)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors (config values, package names)
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for archdesk operations
pub type Result<T> = std::result::Result<T, ArchDeskError>;

impl ArchDeskError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Failure of one package-manager invocation.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The process could not be started at all
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully (code -1 when killed by a signal)
    #[error("{program} exited with code {code}: {stderr}")]
    ExitStatus {
        program: String,
        code: i32,
        stderr: String,
    },

    /// No AUR helper binary on PATH
    #[error("AUR helper {0} is not installed")]
    HelperUnavailable(AurHelper),
}

impl InstallError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::HelperUnavailable(_))
    }
}
