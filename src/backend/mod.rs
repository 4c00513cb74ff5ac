//! Backend adapters.
//!
//! # Data Flow
//! ```text
//! Logger::log(level, payload, fields)
//!     → level gate (logger core)
//!     → Record { level, payload, merged fields, timestamp }
//!     → remote.rs (enqueue → worker → Transport, batched)
//!     → local.rs  (encode text/JSON → sink, synchronous)
//! ```
//!
//! # Design Decisions
//! - Backends receive fields already merged (call-site over common)
//! - Severity translation is a pure table per backend (severity.rs)
//! - No adapter filters on level; each writes whatever the core lets
//!   through

pub mod local;
pub mod remote;
pub mod severity;

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::LoggingResult;
use crate::logger::{Fields, Level};

pub use local::{Encoding, LocalBackend, LocalConfig};
pub use remote::{RemoteBackend, RemoteConfig};

/// The message part of a log event.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Plain text message.
    Text(String),
    /// Compound value, sent as a JSON payload where the backend supports it.
    Json(Value),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(s) => f.write_str(s),
            Payload::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<fmt::Arguments<'_>> for Payload {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Payload::Text(args.to_string())
    }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Self {
        Payload::Json(v)
    }
}

/// One log event, as handed to every backend.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub payload: Payload,
    /// Common fields with call-site fields merged over them.
    pub fields: Fields,
    pub timestamp: DateTime<Utc>,
}

impl Record {
    pub fn new(level: Level, payload: Payload, fields: Fields) -> Self {
        Self {
            level,
            payload,
            fields,
            timestamp: Utc::now(),
        }
    }
}

/// Capability set shared by all backend adapters.
///
/// Implementations must be safe to call `emit` from many threads at once.
pub trait Backend: Send + Sync {
    /// Short name for diagnostics ("local", "remote").
    fn name(&self) -> &'static str;

    /// Render and write (or enqueue) one event.
    fn emit(&self, record: &Record);

    /// Record the level set on the logger. Adapters never filter on it.
    fn set_level(&self, level: Level);

    /// Block until buffered output has been written.
    fn flush(&self) -> LoggingResult<()>;

    /// Flush and release resources.
    fn close(&self) -> LoggingResult<()>;

    /// Whether `emit` at fatal level terminates the process by itself.
    fn exits_on_fatal(&self) -> bool {
        false
    }
}
