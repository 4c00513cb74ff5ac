//! Deployment platforms.
//!
//! # Data Flow
//! ```text
//! environment variables (env.rs)
//!     → constructors.rs (pick backends, build resource descriptor)
//!     → Options
//!     → Logger::new
//! ```
//!
//! # Design Decisions
//! - Probing is separated from building so the decision is testable
//!   without touching the process environment
//! - Cloud platforms that require identity fail with the name of the
//!   missing variable; App Engine and Cloud Run fall back to local output

pub mod constructors;
pub mod env;
pub mod resource;

pub use constructors::*;
pub use env::{EnvSource, ProcessEnv};
pub use resource::MonitoredResource;
