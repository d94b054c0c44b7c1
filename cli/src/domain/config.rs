//! Domain types and validators for svcman configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.svcman/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SvcmanConfig {
    /// Base URL of the artifact repository.
    pub repository_url: String,
    /// Root under which every service gets its install directory.
    /// Defaults to `~/.svcman/workspace` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<PathBuf>,
    /// Services file path. Defaults to `services.yaml` next to the config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services_file: Option<PathBuf>,
}

impl Default for SvcmanConfig {
    fn default() -> Self {
        Self {
            repository_url: default_repository_url(),
            workspace: None,
            services_file: None,
        }
    }
}

fn default_repository_url() -> String {
    "http://localhost:8081/artifactory/releases".to_string()
}

/// Per-invocation options for a start sequence.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Use whatever is installed; never contact the repository.
    pub offline: bool,
    /// Reinstall even when the current install verifies.
    pub clean: bool,
    /// Port override; `None` or `0` keeps the service default.
    pub port: Option<u16>,
    /// User-supplied extra arguments keyed by service id.
    pub extra_args: HashMap<String, Vec<String>>,
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Install directory for a service: `<workspace>/install/<service_id>`.
#[must_use]
pub fn install_dir(workspace: &Path, service_id: &str) -> PathBuf {
    workspace.join("install").join(service_id)
}

/// Parse the `--append-args` JSON object: `{"SERVICE": ["-Dk=v", ...]}`.
///
/// # Errors
///
/// Returns an error if the value is not a JSON object of string arrays.
pub fn parse_extra_args(raw: &str) -> Result<HashMap<String, Vec<String>>> {
    serde_json::from_str(raw).map_err(|e| ConfigError::InvalidExtraArgs(e.to_string()).into())
}

/// Validates the repository base URL scheme.
///
/// # Errors
///
/// Returns an error unless the URL starts with `http://` or `https://`.
pub fn validate_repository_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidRepositoryUrl(url.to_string()).into())
    }
}
