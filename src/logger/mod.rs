//! Logger core.
//!
//! # Data Flow
//! ```text
//! Options (builder or config file)
//!     → Logger::new (validate, build backends, all-or-nothing)
//!     → Logger { level, common fields, Arc<backends> }
//!
//! logger.with_additional_fields(..)
//!     → new Logger, same backends, merged fields (parent untouched)
//!
//! logger.info(payload, fields)
//!     → odd-length check → level gate → merge (call site wins)
//!     → fan-out to every backend
//! ```
//!
//! # Design Decisions
//! - One gate in the core so every backend sees the same decision
//! - Field sets are owned per logger and copied on derive; backends are
//!   shared through `Arc`
//! - Fatal writes and flushes everything before terminating once

pub mod facade;
pub mod fields;
pub mod level;
pub mod options;

pub use facade::Logger;
pub use fields::{FieldValue, Fields, IntoFields, KeyValues};
pub use level::{Level, ParseLevelError};
pub use options::{FatalHandler, Options};
