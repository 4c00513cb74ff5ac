//! Configuration management.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LoggingConfig
//!     → Options::from_config → Logger::new
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so a minimal file is valid
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every problem at once

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::LoggingConfig;
pub use validation::{validate_config, ValidationError};
