//! Local synchronous backend.
//!
//! # Responsibilities
//! - Encode one event per line as text (`key=value`) or JSON
//! - Write to stdout/stderr or files opened at construction
//! - Keep an atomic level handle that `set_level` updates in place; the
//!   logger core is the only gate, so `emit` writes whatever reaches it
//! - Carry a distinguished error stream for the adapter's own failures

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::backend::severity::local_severity;
use crate::backend::{Backend, Payload, Record};
use crate::error::{LoggingError, LoggingResult};
use crate::logger::{FieldValue, Level};

/// Keys owned by the JSON encoder; custom fields never overwrite them.
const RESERVED_KEYS: [&str; 3] = ["timestamp", "level", "message"];

/// Line encoding of the local backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Human-readable `timestamp LEVEL message key=value ...`.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Local backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Line encoding.
    pub encoding: Encoding,

    /// Output path; "stdout" and "stderr" name the standard streams.
    pub output_path: String,

    /// Error output path for the adapter's own failures.
    pub error_output_path: String,

    /// Exit the process after writing a fatal line.
    pub exit_on_fatal: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::Text,
            output_path: "stdout".to_string(),
            error_output_path: "stderr".to_string(),
            exit_on_fatal: false,
        }
    }
}

impl LocalConfig {
    /// Text to stdout/stderr.
    pub fn text() -> Self {
        Self::default()
    }

    /// JSON to stdout/stderr.
    pub fn json() -> Self {
        Self {
            encoding: Encoding::Json,
            ..Self::default()
        }
    }

    /// Override output paths: first is the normal output, second the error
    /// output. Missing or empty entries keep the defaults.
    pub fn with_paths<S: AsRef<str>>(mut self, paths: &[S]) -> Self {
        if let Some(p) = paths.first().map(AsRef::as_ref).filter(|p| !p.is_empty()) {
            self.output_path = p.to_string();
        }
        if let Some(p) = paths.get(1).map(AsRef::as_ref).filter(|p| !p.is_empty()) {
            self.error_output_path = p.to_string();
        }
        self
    }
}

type Sink = Box<dyn Write + Send>;

fn open_sink(path: &str) -> LoggingResult<Sink> {
    match path {
        "stdout" => Ok(Box::new(io::stdout())),
        "stderr" => Ok(Box::new(io::stderr())),
        _ => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenOutput {
                    path: path.to_string(),
                    source,
                })?;
            Ok(Box::new(file))
        }
    }
}

/// Synchronous line logger.
pub struct LocalBackend {
    encoding: Encoding,
    exit_on_fatal: bool,
    level: AtomicU8,
    out: Mutex<Sink>,
    err: Mutex<Sink>,
}

impl LocalBackend {
    /// Open the configured sinks. An unopenable path is an error.
    pub fn new(config: &LocalConfig, level: Level) -> LoggingResult<Self> {
        let out = open_sink(&config.output_path)?;
        let err = open_sink(&config.error_output_path)?;
        Ok(Self::with_writers(config, level, out, err))
    }

    /// Use caller-supplied writers instead of the configured paths.
    pub fn with_writers(config: &LocalConfig, level: Level, out: Sink, err: Sink) -> Self {
        Self {
            encoding: config.encoding,
            exit_on_fatal: config.exit_on_fatal,
            level: AtomicU8::new(level as u8),
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    pub fn level(&self) -> Level {
        Level::from(self.level.load(Ordering::Relaxed))
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Write a diagnostic line to the error stream.
    pub fn report_error(&self, message: &str) {
        let line = format!(
            "{} ERROR {}\n",
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            message
        );
        let mut err = self.err.lock().unwrap_or_else(|e| e.into_inner());
        let _ = err.write_all(line.as_bytes());
        let _ = err.flush();
    }

    /// Encode a record as a single line, newline included.
    pub fn encode(&self, record: &Record) -> String {
        match self.encoding {
            Encoding::Text => encode_text(record),
            Encoding::Json => encode_json(record),
        }
    }
}

fn encode_text(record: &Record) -> String {
    let mut line = format!(
        "{} {} {}",
        record
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        local_severity(record.level).tag(),
        escape_line_breaks(&record.payload.to_string())
    );
    for (key, value) in record.fields.iter() {
        line.push(' ');
        if needs_quoting(key) {
            line.push_str(&format!("{:?}", key));
        } else {
            line.push_str(key);
        }
        line.push('=');
        match value {
            FieldValue::Str(s) if needs_quoting(s) => line.push_str(&format!("{:?}", s)),
            other => line.push_str(&other.to_string()),
        }
    }
    line.push('\n');
    line
}

fn escape_line_breaks(s: &str) -> String {
    if !s.contains(['\n', '\r']) {
        return s.to_string();
    }
    s.replace('\r', "\\r").replace('\n', "\\n")
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '"' || c == '=')
}

fn encode_json(record: &Record) -> String {
    let mut obj = Map::new();
    obj.insert(
        "timestamp".to_string(),
        Value::String(
            record
                .timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        ),
    );
    obj.insert(
        "level".to_string(),
        Value::String(local_severity(record.level).as_str().to_string()),
    );
    let message = match &record.payload {
        Payload::Text(s) => Value::String(s.clone()),
        Payload::Json(v) => v.clone(),
    };
    obj.insert("message".to_string(), message);

    for (key, value) in record.fields.iter() {
        let key = if RESERVED_KEYS.contains(&key) {
            format!("fields.{}", key)
        } else {
            key.to_string()
        };
        obj.insert(key, serde_json::to_value(value).unwrap_or(Value::Null));
    }

    let mut line = Value::Object(obj).to_string();
    line.push('\n');
    line
}

impl Backend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    fn emit(&self, record: &Record) {
        let line = self.encode(record);
        let result = {
            let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
            out.write_all(line.as_bytes())
        };
        if let Err(e) = result {
            self.report_error(&format!("failed to write log line: {}", e));
        }

        if record.level == Level::Fatal && self.exit_on_fatal {
            let _ = self.flush();
            std::process::exit(1);
        }
    }

    fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    fn flush(&self) -> LoggingResult<()> {
        self.out.lock().unwrap_or_else(|e| e.into_inner()).flush()?;
        self.err.lock().unwrap_or_else(|e| e.into_inner()).flush()?;
        Ok(())
    }

    fn close(&self) -> LoggingResult<()> {
        self.flush()
    }

    fn exits_on_fatal(&self) -> bool {
        self.exit_on_fatal
    }
}

impl std::fmt::Debug for LocalBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalBackend")
            .field("encoding", &self.encoding)
            .field("level", &self.level())
            .field("exit_on_fatal", &self.exit_on_fatal)
            .finish()
    }
}
