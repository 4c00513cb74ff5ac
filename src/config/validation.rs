//! Configuration validation.
//!
//! # Responsibilities
//! - Required identity fields of the remote backend
//! - Value ranges (batch size, intervals, timeouts)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: LoggingConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::LoggingConfig;

/// A single semantic problem in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("remote.project_id must not be empty")]
    MissingProjectId,

    #[error("remote.log_id must not be empty")]
    MissingLogId,

    #[error("{field} must be greater than 0")]
    NotPositive { field: &'static str },

    #[error("local.{field} must not be empty")]
    EmptyPath { field: &'static str },
}

pub fn validate_config(config: &LoggingConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(remote) = &config.remote {
        if remote.project_id.trim().is_empty() {
            errors.push(ValidationError::MissingProjectId);
        }
        if remote.log_id.trim().is_empty() {
            errors.push(ValidationError::MissingLogId);
        }
        if remote.batch_size == 0 {
            errors.push(ValidationError::NotPositive {
                field: "remote.batch_size",
            });
        }
        if remote.flush_interval_ms == 0 {
            errors.push(ValidationError::NotPositive {
                field: "remote.flush_interval_ms",
            });
        }
        if remote.request_timeout_secs == 0 {
            errors.push(ValidationError::NotPositive {
                field: "remote.request_timeout_secs",
            });
        }
    }

    if let Some(local) = &config.local {
        if local.output_path.trim().is_empty() {
            errors.push(ValidationError::EmptyPath {
                field: "output_path",
            });
        }
        if local.error_output_path.trim().is_empty() {
            errors.push(ValidationError::EmptyPath {
                field: "error_output_path",
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
