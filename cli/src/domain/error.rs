//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Start errors ──────────────────────────────────────────────────────────────

/// Terminal failures of a single start attempt. None are retried internally.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("{0} is not a valid service. Run 'svcman services' to list them.")]
    UnknownService(String),

    #[error("{0} is already running.")]
    AlreadyRunning(String),

    #[error("No version found for {service}")]
    VersionResolution {
        service: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{0} is unavailable: no usable install and running offline.")]
    Unavailable(String),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to find service directory in {}", .dir.display())]
    Download {
        dir: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to persist {record} for {}", .dir.display())]
    Persist {
        record: &'static str,
        dir: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to launch {}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl StartError {
    /// Wrap a filesystem failure with a human-readable context line.
    pub fn io(context: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownService(_) => "unknown_service",
            Self::AlreadyRunning(_) => "already_running",
            Self::VersionResolution { .. } => "version_resolution",
            Self::Unavailable(_) => "unavailable",
            Self::Io { .. } => "io",
            Self::Download { .. } => "download",
            Self::Persist { .. } => "persist",
            Self::Launch { .. } => "launch",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors found while validating the service registry and settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Service '{0}' has an empty binary command.")]
    EmptyCommand(String),

    #[error("Invalid service id '{0}': must be a single path segment.")]
    InvalidServiceId(String),

    #[error("Service id mismatch: entry '{key}' declares id '{id}'.")]
    IdMismatch { key: String, id: String },

    #[error("Invalid --append-args value: {0}")]
    InvalidExtraArgs(String),

    #[error("Repository URL must start with http:// or https://: {0}")]
    InvalidRepositoryUrl(String),

    #[error("Workspace must be an absolute path: {}", .0.display())]
    RelativeWorkspace(PathBuf),
}
