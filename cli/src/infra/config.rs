//! YAML configuration and service registry loading.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::{SvcmanConfig, validate_repository_url};
use crate::domain::error::ConfigError;
use crate::domain::service::{ServiceEntry, ServiceRegistry};
use crate::infra::fs::svcman_dir;

/// Default services file name, looked up next to the config file.
pub const SERVICES_FILENAME: &str = "services.yaml";

/// Loads `config.yaml` and the services file it points to.
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    /// Use an explicit config path (from `--config` / `SVCMAN_CONFIG`).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Use `~/.svcman/config.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(svcman_dir()?.join("config.yaml")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds an
    /// invalid repository URL or a relative workspace.
    pub fn load(&self) -> Result<SvcmanConfig> {
        let config: SvcmanConfig = if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)
                .with_context(|| format!("cannot read {}", self.path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("cannot parse {}", self.path.display()))?
        } else {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            SvcmanConfig::default()
        };
        validate_repository_url(&config.repository_url)?;
        if let Some(ws) = &config.workspace {
            if !ws.is_absolute() {
                return Err(ConfigError::RelativeWorkspace(ws.clone()).into());
            }
        }
        Ok(config)
    }

    /// Services file for a config: the configured path (relative paths are
    /// taken from the config file's directory) or `services.yaml` beside it.
    #[must_use]
    pub fn services_path(&self, config: &SvcmanConfig) -> PathBuf {
        let base = self.path.parent().unwrap_or_else(|| Path::new("."));
        match &config.services_file {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => base.join(p),
            None => base.join(SERVICES_FILENAME),
        }
    }

    /// Load the service registry. A missing services file yields an empty registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an entry is invalid.
    pub fn load_registry(&self, config: &SvcmanConfig) -> Result<ServiceRegistry> {
        let path = self.services_path(config);
        if !path.exists() {
            tracing::warn!(path = %path.display(), "services file not found, registry is empty");
            return Ok(ServiceRegistry::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let entries: BTreeMap<String, ServiceEntry> = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        ServiceRegistry::from_entries(entries)
            .with_context(|| format!("invalid services file {}", path.display()))
    }

    /// Workspace root: configured, or `~/.svcman/workspace`.
    ///
    /// # Errors
    ///
    /// Returns an error if no workspace is configured and the home directory
    /// cannot be determined.
    pub fn workspace(&self, config: &SvcmanConfig) -> Result<PathBuf> {
        match &config.workspace {
            Some(ws) => Ok(ws.clone()),
            None => Ok(svcman_dir()?.join("workspace")),
        }
    }
}
