//! Level → native severity tables, one per backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::logger::Level;

/// Severity of the local text/JSON logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LocalSeverity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LocalSeverity {
    /// Uppercase tag for text lines.
    pub fn tag(&self) -> &'static str {
        match self {
            LocalSeverity::Debug => "DEBUG",
            LocalSeverity::Info => "INFO",
            LocalSeverity::Warn => "WARN",
            LocalSeverity::Error => "ERROR",
            LocalSeverity::Fatal => "FATAL",
        }
    }

    /// Lowercase name for the JSON `level` key.
    pub fn as_str(&self) -> &'static str {
        match self {
            LocalSeverity::Debug => "debug",
            LocalSeverity::Info => "info",
            LocalSeverity::Warn => "warn",
            LocalSeverity::Error => "error",
            LocalSeverity::Fatal => "fatal",
        }
    }
}

/// Google Cloud Logging `LogSeverity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RemoteSeverity {
    Default,
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl fmt::Display for RemoteSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteSeverity::Default => "DEFAULT",
            RemoteSeverity::Debug => "DEBUG",
            RemoteSeverity::Info => "INFO",
            RemoteSeverity::Notice => "NOTICE",
            RemoteSeverity::Warning => "WARNING",
            RemoteSeverity::Error => "ERROR",
            RemoteSeverity::Critical => "CRITICAL",
            RemoteSeverity::Alert => "ALERT",
            RemoteSeverity::Emergency => "EMERGENCY",
        };
        f.write_str(name)
    }
}

pub fn local_severity(level: Level) -> LocalSeverity {
    match level {
        Level::Debug => LocalSeverity::Debug,
        Level::Info => LocalSeverity::Info,
        Level::Warning => LocalSeverity::Warn,
        Level::Error => LocalSeverity::Error,
        Level::Fatal => LocalSeverity::Fatal,
    }
}

pub fn remote_severity(level: Level) -> RemoteSeverity {
    match level {
        Level::Debug => RemoteSeverity::Debug,
        Level::Info => RemoteSeverity::Info,
        Level::Warning => RemoteSeverity::Warning,
        Level::Error => RemoteSeverity::Error,
        Level::Fatal => RemoteSeverity::Critical,
    }
}
