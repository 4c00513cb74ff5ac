//! Structured logging facade over a local text/JSON logger and Google
//! Cloud Logging.
//!
//! # Architecture Overview
//!
//! ```text
//!   environment ──▶ platform ──▶ Options ◀── config (TOML)
//!                                   │
//!                                   ▼
//!                            ┌─────────────┐
//!   caller ─── log(..) ────▶ │   Logger    │  level gate, common fields
//!                            └──────┬──────┘
//!                                   │ fan-out (Arc-shared backends)
//!                     ┌─────────────┴─────────────┐
//!                     ▼                           ▼
//!              ┌─────────────┐            ┌──────────────┐
//!              │   remote    │            │    local     │
//!              │ queue+worker│            │ text / JSON  │
//!              └──────┬──────┘            └──────┬───────┘
//!                     ▼                          ▼
//!             Cloud Logging API            stdout / files
//! ```
//!
//! # Example
//!
//! ```
//! use cloud_logging::{kv, Level, LocalConfig, Logger, Options};
//!
//! let log = Logger::new(
//!     Options::new()
//!         .level(Level::Info)
//!         .local(LocalConfig::json())
//!         .common_fields(kv!["service", "billing"]),
//! )
//! .unwrap();
//!
//! let request_log = log.with_additional_fields(kv!["request_id", "r-17"]);
//! request_log.info("charge accepted", kv!["amount_cents", 1299]);
//! log.close().unwrap();
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod logger;
pub mod observability;
pub mod platform;

pub use backend::remote::{ErrorHook, Transport, TransportError};
pub use backend::{Backend, Encoding, LocalConfig, Payload, Record, RemoteConfig};
pub use config::LoggingConfig;
pub use error::{LoggingError, LoggingResult};
pub use logger::{FieldValue, Fields, IntoFields, KeyValues, Level, Logger, Options};
pub use platform::MonitoredResource;
