//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifact;
pub mod config;
pub mod error;
pub mod launch;
pub mod progress;
pub mod service;

pub use config::{RunOptions, SvcmanConfig};
pub use error::{ConfigError, StartError};
pub use progress::ProgressEvent;
pub use service::{BinaryDescriptor, ServiceDefinition, ServiceRegistry};
pub use svcman_common::{InstallRecord, RuntimeStateRecord};
