//! Crate-level error type.

use std::io;

use thiserror::Error;

use crate::backend::remote::TransportError;

/// Errors returned by logger construction and lifecycle calls.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The remote backend was requested without a project id.
    #[error("remote logging requires a GCP project ID")]
    MissingProjectId,

    /// Options were inconsistent or out of range.
    #[error("invalid logging configuration: {0}")]
    InvalidConfig(String),

    /// A local output path could not be opened.
    #[error("failed to open log output '{path}': {source}")]
    OpenOutput {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A flat key/value sequence had a dangling key.
    #[error("odd number of key/value elements: {0}")]
    OddFieldCount(usize),

    /// A platform constructor did not find a required variable.
    #[error("env var {0} missing")]
    MissingEnvVar(String),

    /// The remote worker thread could not be started.
    #[error("failed to start remote logging worker: {0}")]
    Worker(#[source] io::Error),

    /// Flushing a local sink failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The remote transport reported a failure.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for logging operations.
pub type LoggingResult<T> = Result<T, LoggingError>;
