//! The logger: level gate, common fields and fan-out.

use std::fmt;
use std::sync::Arc;

use crate::backend::remote::{default_error_hook, ErrorHook, TransportError};
use crate::backend::{Backend, LocalBackend, Payload, Record, RemoteBackend};
use crate::error::LoggingResult;
use crate::logger::options::FatalHandler;
use crate::logger::{Fields, IntoFields, KeyValues, Level, Options};

/// Structured logger writing to zero or more backends.
///
/// Log calls take `&self` and are safe to make from many threads at once.
/// [`set_level`](Logger::set_level) takes `&mut self`, so changing the level
/// is serialized by the borrow checker; set it at startup.
///
/// Cloning or deriving with
/// [`with_additional_fields`](Logger::with_additional_fields) shares the
/// backends. Close the root logger once, at shutdown.
#[derive(Clone)]
pub struct Logger {
    level: Level,
    fields: Fields,
    backends: Vec<Arc<dyn Backend>>,
    on_fatal: FatalHandler,
}

impl Logger {
    /// Build a logger and every requested backend. Nothing is returned if
    /// any backend fails to build.
    pub fn new(options: Options) -> LoggingResult<Self> {
        options.validate()?;

        let Options {
            level,
            local,
            remote,
            common_fields,
            local_writers,
            transport,
            on_transport_error,
            on_fatal,
            extra_backends,
        } = options;

        let local = match local {
            Some(config) => Some(Arc::new(match local_writers {
                Some((out, err)) => LocalBackend::with_writers(&config, level, out, err),
                None => LocalBackend::new(&config, level)?,
            })),
            None => None,
        };

        let mut backends: Vec<Arc<dyn Backend>> = Vec::new();

        if let Some(config) = remote {
            let on_error = on_transport_error.unwrap_or_else(|| error_hook_for(local.clone()));
            let remote = match transport {
                Some(t) => RemoteBackend::with_transport(&config, t, on_error)?,
                None => RemoteBackend::new(&config, on_error)?,
            };
            backends.push(Arc::new(remote));
        }
        if let Some(local) = local {
            backends.push(local);
        }
        backends.extend(extra_backends);

        tracing::debug!(
            level = %level,
            backends = ?backends.iter().map(|b| b.name()).collect::<Vec<_>>(),
            "Logger created"
        );

        Ok(Self {
            level,
            fields: common_fields,
            backends,
            on_fatal: on_fatal.unwrap_or_else(|| Arc::new(|| std::process::exit(1))),
        })
    }

    /// Like [`new`](Logger::new), for startup code that treats failure as
    /// unrecoverable.
    ///
    /// # Panics
    /// Panics if the logger cannot be built.
    pub fn must_new(options: Options) -> Self {
        match Self::new(options) {
            Ok(logger) => logger,
            Err(e) => panic!("failed to create logger: {}", e),
        }
    }

    /// A logger with no backends; every call is a no-op.
    pub fn null() -> Self {
        Self {
            level: Level::default(),
            fields: Fields::new(),
            backends: Vec::new(),
            on_fatal: Arc::new(|| {}),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Change this logger's level gate and propagate the level to the
    /// backends' handles.
    ///
    /// Only the logger core filters, so parent and derived loggers keep
    /// their own gates even though they share backends.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
        for backend in &self.backends {
            backend.set_level(level);
        }
    }

    pub fn common_fields(&self) -> &Fields {
        &self.fields
    }

    /// Names of the active backends, in fan-out order.
    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn is_null(&self) -> bool {
        self.backends.is_empty()
    }

    /// A new logger sharing this one's backends, with `fields` merged over
    /// the common fields. `self` is not modified.
    ///
    /// # Panics
    /// Panics on an odd-length [`KeyValues`] sequence.
    pub fn with_additional_fields(&self, fields: impl IntoFields) -> Logger {
        let mut child = self.clone();
        child.fields.extend(fields.into_fields());
        child
    }

    /// Like [`with_additional_fields`](Logger::with_additional_fields), but
    /// returns `OddFieldCount` instead of panicking.
    pub fn try_with_additional_fields(&self, kvs: KeyValues) -> LoggingResult<Logger> {
        let fields = Fields::try_from_flat(kvs.0)?;
        Ok(self.with_additional_fields(fields))
    }

    /// Structured log call at `level`.
    ///
    /// # Panics
    /// Panics on an odd-length [`KeyValues`] sequence, whatever the level.
    pub fn log(&self, level: Level, payload: impl Into<Payload>, fields: impl IntoFields) {
        let fields = fields.into_fields();
        if level < self.level {
            return;
        }
        let merged = if fields.is_empty() {
            self.fields.clone()
        } else {
            self.fields.merge(&fields)
        };
        self.dispatch(Record::new(level, payload.into(), merged));
    }

    /// Formatted log call at `level`; carries the common fields.
    pub fn logf(&self, level: Level, args: fmt::Arguments<'_>) {
        if level < self.level {
            return;
        }
        self.dispatch(Record::new(level, Payload::from(args), self.fields.clone()));
    }

    pub fn trace(&self, payload: impl Into<Payload>, fields: impl IntoFields) {
        self.log(Level::TRACE, payload, fields);
    }

    pub fn debug(&self, payload: impl Into<Payload>, fields: impl IntoFields) {
        self.log(Level::Debug, payload, fields);
    }

    pub fn info(&self, payload: impl Into<Payload>, fields: impl IntoFields) {
        self.log(Level::Info, payload, fields);
    }

    pub fn warning(&self, payload: impl Into<Payload>, fields: impl IntoFields) {
        self.log(Level::Warning, payload, fields);
    }

    pub fn error(&self, payload: impl Into<Payload>, fields: impl IntoFields) {
        self.log(Level::Error, payload, fields);
    }

    /// Log at fatal level, then terminate the process.
    ///
    /// Every backend is written and flushed first. A null logger does
    /// nothing.
    pub fn fatal(&self, payload: impl Into<Payload>, fields: impl IntoFields) {
        self.log(Level::Fatal, payload, fields);
    }

    pub fn tracef(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::TRACE, args);
    }

    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Debug, args);
    }

    /// Debug level, for code written against a `printf`-style logger.
    pub fn printf(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Debug, args);
    }

    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Info, args);
    }

    pub fn warningf(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Warning, args);
    }

    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Error, args);
    }

    /// Formatted fatal; terminates like [`fatal`](Logger::fatal).
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        self.logf(Level::Fatal, args);
    }

    /// Flush every backend. All are attempted; the first error is returned.
    pub fn flush(&self) -> LoggingResult<()> {
        let mut first = None;
        for backend in &self.backends {
            if let Err(e) = backend.flush() {
                tracing::debug!(backend = backend.name(), error = %e, "Flush failed");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Flush and close every backend. All are attempted; the first error is
    /// returned. Loggers derived from this one stop writing remotely.
    pub fn close(&self) -> LoggingResult<()> {
        let mut first = None;
        for backend in &self.backends {
            if let Err(e) = backend.close() {
                tracing::debug!(backend = backend.name(), error = %e, "Close failed");
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    fn dispatch(&self, record: Record) {
        if record.level != Level::Fatal {
            for backend in &self.backends {
                backend.emit(&record);
            }
            return;
        }
        if self.backends.is_empty() {
            return;
        }

        // Backends that exit on their own go last, after everything else
        // has been written and flushed.
        let (exiting, others): (Vec<_>, Vec<_>) =
            self.backends.iter().partition(|b| b.exits_on_fatal());
        for backend in &others {
            backend.emit(&record);
        }
        for backend in &others {
            if let Err(e) = backend.flush() {
                tracing::error!(backend = backend.name(), error = %e, "Flush before exit failed");
            }
        }
        if exiting.is_empty() {
            (self.on_fatal)();
            return;
        }
        for backend in &exiting {
            backend.emit(&record);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("fields", &self.fields)
            .field("backends", &self.backend_names())
            .finish()
    }
}

/// Transport failures go to tracing and, when present, to the local
/// backend's error stream.
fn error_hook_for(local: Option<Arc<LocalBackend>>) -> ErrorHook {
    match local {
        None => default_error_hook(),
        Some(local) => {
            let fallback = default_error_hook();
            Arc::new(move |e: &TransportError| {
                fallback(e);
                local.report_error(&format!("google cloud logging error: {}", e));
            })
        }
    }
}
