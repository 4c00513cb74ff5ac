//! Observability of the logging pipeline itself.
//!
//! # Data Flow
//! ```text
//! remote worker, backends
//!     → tracing events (crate diagnostics, never the application's logs)
//!     → metrics.rs (entry/batch counters)
//!
//! Binary:
//!     → logging.rs installs the tracing subscriber
//! ```
//!
//! # Design Decisions
//! - Diagnostics use `tracing` so a host application controls them with
//!   its own subscriber; the library never installs one
//! - Metrics go through the `metrics` facade and cost nothing without a
//!   recorder

pub mod logging;
pub mod metrics;
