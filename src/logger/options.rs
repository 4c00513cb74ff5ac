//! Logger construction options.
//!
//! Options are applied in call order; a later call replaces an earlier one
//! for the same single-valued option.

use std::io::Write;
use std::sync::Arc;

use crate::backend::remote::{ErrorHook, Transport, TransportError};
use crate::backend::{Backend, LocalConfig, RemoteConfig};
use crate::config::LoggingConfig;
use crate::error::LoggingResult;
use crate::logger::{Fields, IntoFields, Level};

/// Called after a fatal event has been written and flushed.
pub type FatalHandler = Arc<dyn Fn() + Send + Sync>;

/// Writer pair overriding the local backend's configured paths.
pub(crate) type WriterPair = (Box<dyn Write + Send>, Box<dyn Write + Send>);

/// Builder for [`Logger::new`](crate::Logger::new).
#[derive(Default)]
pub struct Options {
    pub(crate) level: Level,
    pub(crate) local: Option<LocalConfig>,
    pub(crate) remote: Option<RemoteConfig>,
    pub(crate) common_fields: Fields,
    pub(crate) local_writers: Option<WriterPair>,
    pub(crate) transport: Option<Arc<dyn Transport>>,
    pub(crate) on_transport_error: Option<ErrorHook>,
    pub(crate) on_fatal: Option<FatalHandler>,
    pub(crate) extra_backends: Vec<Arc<dyn Backend>>,
}

impl Options {
    /// No backends, debug level: a null logger unless more is added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options described by a config file.
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            level: config.level,
            local: config.local.clone(),
            remote: config.remote.clone(),
            common_fields: config.common_fields.clone(),
            ..Self::default()
        }
    }

    /// Initial level gate.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable the local backend.
    pub fn local(mut self, config: LocalConfig) -> Self {
        self.local = Some(config);
        self
    }

    /// Enable the remote backend.
    pub fn remote(mut self, config: RemoteConfig) -> Self {
        self.remote = Some(config);
        self
    }

    /// Seed the common fields. Replaces any previously set common fields.
    ///
    /// # Panics
    /// Panics on an odd-length [`KeyValues`](crate::KeyValues) sequence.
    pub fn common_fields(mut self, fields: impl IntoFields) -> Self {
        self.common_fields = fields.into_fields();
        self
    }

    /// Write local output to the given writers instead of the configured
    /// paths. Enables the local backend with defaults if it is not enabled.
    pub fn local_writer(
        mut self,
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> Self {
        self.local_writers = Some((Box::new(out), Box::new(err)));
        if self.local.is_none() {
            self.local = Some(LocalConfig::default());
        }
        self
    }

    /// Submit remote entries through this transport instead of HTTP.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Receive background transport failures.
    pub fn on_transport_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&TransportError) + Send + Sync + 'static,
    {
        self.on_transport_error = Some(Arc::new(hook));
        self
    }

    /// Replace the default fatal action (`std::process::exit(1)`). It is not
    /// run when a backend exits the process on its own.
    pub fn on_fatal<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_fatal = Some(Arc::new(handler));
        self
    }

    /// Add a custom backend, fanned out after the built-in ones.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.extra_backends.push(backend);
        self
    }

    /// Check option consistency before any backend is built.
    pub fn validate(&self) -> LoggingResult<()> {
        if let Some(remote) = &self.remote {
            remote.validate()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("level", &self.level)
            .field("local", &self.local)
            .field("remote", &self.remote)
            .field("common_fields", &self.common_fields)
            .field("local_writers", &self.local_writers.is_some())
            .field("transport", &self.transport.is_some())
            .field("extra_backends", &self.extra_backends.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoggingError;
    use crate::{fields, kv};

    #[test]
    fn test_last_option_wins() {
        let opts = Options::new()
            .level(Level::Info)
            .local(LocalConfig::text())
            .level(Level::Error)
            .local(LocalConfig::json())
            .common_fields(kv!["a", 1])
            .common_fields(fields! { "b" => 2 });

        assert_eq!(opts.level, Level::Error);
        assert_eq!(opts.local, Some(LocalConfig::json()));
        assert_eq!(opts.common_fields, fields! { "b" => 2 });
    }

    #[test]
    fn test_remote_without_project_fails_validation() {
        let opts = Options::new().remote(RemoteConfig::new("", "log"));
        assert!(matches!(opts.validate(), Err(LoggingError::MissingProjectId)));
    }

    #[test]
    fn test_local_writer_enables_local() {
        let opts = Options::new().local_writer(Vec::new(), Vec::new());
        assert_eq!(opts.local, Some(LocalConfig::default()));
    }

    #[test]
    #[should_panic(expected = "odd number")]
    fn test_odd_common_fields_panic() {
        let _ = Options::new().common_fields(kv!["k1", "v1", "k2"]);
    }
}
