//! Remote (Cloud Logging) backend.
//!
//! # Data Flow
//! ```text
//! emit(record)
//!     → entry.rs (severity, labels, resource, insert id)
//!     → unbounded channel (never blocks the caller)
//!     → worker.rs (batch by size / interval)
//!     → transport.rs (HTTP entries:write)
//!     → failures → error hook (out of band)
//! ```
//!
//! # Design Decisions
//! - One client per adapter; derived loggers share the adapter via `Arc`
//! - `flush` is the only blocking point; it returns the first transport
//!   error seen since the previous flush
//! - `close` flushes before releasing the client and reports the flush
//!   error in preference to the release error
//! - No level gating here; the logger core decides once for all backends

pub mod entry;
pub mod transport;
mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc as std_mpsc, Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::backend::{Backend, Record};
use crate::error::{LoggingError, LoggingResult};
use crate::logger::Level;
use crate::observability::metrics;
use crate::platform::MonitoredResource;

pub use entry::{log_name, LogEntry, WriteRequest};
pub use transport::{HttpTransport, Transport, TransportError};

use worker::{Command, Worker};

/// Out-of-band receiver of background transport failures.
pub type ErrorHook = Arc<dyn Fn(&TransportError) + Send + Sync>;

/// Default hook: a tracing error event.
pub fn default_error_hook() -> ErrorHook {
    Arc::new(|e: &TransportError| {
        tracing::error!(error = %e, "google cloud logging error");
    })
}

/// Remote backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// GCP project id. Required.
    pub project_id: String,

    /// Path of a file holding a bearer token; none means no auth header.
    pub credentials_path: Option<String>,

    /// Log id, e.g. "run.googleapis.com/request_log".
    pub log_id: String,

    /// Resource descriptor attached to every entry.
    pub resource: Option<MonitoredResource>,

    /// Maximum entries per write request.
    pub batch_size: usize,

    /// Interval after which a partial batch is sent, in milliseconds.
    pub flush_interval_ms: u64,

    /// entries:write endpoint.
    pub endpoint: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            credentials_path: None,
            log_id: String::new(),
            resource: None,
            batch_size: 100,
            flush_interval_ms: 1000,
            endpoint: "https://logging.googleapis.com/v2/entries:write".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl RemoteConfig {
    pub fn new(project_id: impl Into<String>, log_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            log_id: log_id.into(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, path: impl Into<String>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    pub fn with_resource(mut self, resource: MonitoredResource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Check the identity fields the adapter cannot default.
    pub fn validate(&self) -> LoggingResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(LoggingError::MissingProjectId);
        }
        if self.log_id.trim().is_empty() {
            return Err(LoggingError::InvalidConfig(
                "remote logging requires a log ID".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(LoggingError::InvalidConfig(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if self.flush_interval_ms == 0 {
            return Err(LoggingError::InvalidConfig(
                "flush_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Asynchronous, batched Cloud Logging adapter.
pub struct RemoteBackend {
    log_name: String,
    resource: Option<MonitoredResource>,
    tx: mpsc::UnboundedSender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
    on_error: ErrorHook,
}

impl RemoteBackend {
    /// Connect with the HTTP transport.
    pub fn new(config: &RemoteConfig, on_error: ErrorHook) -> LoggingResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config)?;
        Self::with_transport(config, Arc::new(transport), on_error)
    }

    /// Use a caller-supplied transport.
    pub fn with_transport(
        config: &RemoteConfig,
        transport: Arc<dyn Transport>,
        on_error: ErrorHook,
    ) -> LoggingResult<Self> {
        config.validate()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(LoggingError::Worker)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker::new(
            rx,
            transport,
            on_error.clone(),
            config.batch_size,
            Duration::from_millis(config.flush_interval_ms),
        );

        let handle = std::thread::Builder::new()
            .name("cloudlog-remote".to_string())
            .spawn(move || runtime.block_on(worker.run()))
            .map_err(LoggingError::Worker)?;

        let log_name = log_name(&config.project_id, &config.log_id);
        tracing::info!(
            log_name = %log_name,
            resource = ?config.resource.as_ref().map(|r| r.kind.as_str()),
            "Remote logger created"
        );

        Ok(Self {
            log_name,
            resource: config.resource.clone(),
            tx,
            worker: Mutex::new(Some(handle)),
            closed: AtomicBool::new(false),
            on_error,
        })
    }

    pub fn log_name(&self) -> &str {
        &self.log_name
    }

    pub fn resource(&self) -> Option<&MonitoredResource> {
        self.resource.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn join_worker(&self) {
        let handle = self.worker.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("Remote logging worker panicked");
            }
        }
    }
}

impl Backend for RemoteBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn emit(&self, record: &Record) {
        let entry = LogEntry::from_record(record, &self.log_name, self.resource.as_ref());
        if self.is_closed() || self.tx.send(Command::Entry(Box::new(entry))).is_err() {
            (self.on_error)(&TransportError::Closed);
            return;
        }
        metrics::record_entry_enqueued();
    }

    fn set_level(&self, _level: Level) {}

    fn flush(&self) -> LoggingResult<()> {
        if self.is_closed() {
            return Ok(());
        }
        // std channel: flush may be called from inside a tokio runtime,
        // where blocking_recv on a tokio channel panics.
        let (ack_tx, ack_rx) = std_mpsc::sync_channel(1);
        self.tx
            .send(Command::Flush(ack_tx))
            .map_err(|_| TransportError::Closed)?;
        match ack_rx.recv() {
            Ok(None) => Ok(()),
            Ok(Some(e)) => Err(e.into()),
            Err(_) => Err(TransportError::Closed.into()),
        }
    }

    fn close(&self) -> LoggingResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let (ack_tx, ack_rx) = std_mpsc::sync_channel(1);
        if self.tx.send(Command::Close(ack_tx)).is_err() {
            self.join_worker();
            return Err(TransportError::Closed.into());
        }
        let outcome = ack_rx.recv();
        self.join_worker();
        tracing::debug!(log_name = %self.log_name, "Remote logger closed");

        match outcome {
            Ok((Some(flush_err), _)) => Err(flush_err.into()),
            Ok((None, Some(close_err))) => Err(close_err.into()),
            Ok((None, None)) => Ok(()),
            Err(_) => Err(TransportError::Closed.into()),
        }
    }
}

impl Drop for RemoteBackend {
    fn drop(&mut self) {
        if !self.is_closed() {
            // Dropping the sender lets the worker drain and exit on its own.
            tracing::warn!(
                log_name = %self.log_name,
                "Remote logger dropped without close; pending entries are drained in the background"
            );
        }
    }
}

impl std::fmt::Debug for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBackend")
            .field("log_name", &self.log_name)
            .field("resource", &self.resource)
            .field("closed", &self.is_closed())
            .finish()
    }
}
