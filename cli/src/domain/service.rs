//! Service definitions and the immutable service registry.
//!
//! Pure types only. The registry is built once from configuration and handed
//! to the service manager at construction time.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

/// How a service's artifact is located and executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryDescriptor {
    /// Artifact name in the repository, e.g. `"auth-service"`.
    pub artifact: String,
    /// Group identifier in the repository, e.g. `"com/example"`.
    pub group_id: String,
    /// Base command tokens. The first token names the program; only its
    /// basename is used, resolved against the unpacked `bin/` directory.
    pub cmd: Vec<String>,
}

impl BinaryDescriptor {
    /// Basename of the program token, e.g. `"./bin/auth"` → `"auth"`.
    #[must_use]
    pub fn program_name(&self) -> Option<&str> {
        let first = self.cmd.first()?;
        first.rsplit(['/', '\\']).next().filter(|s| !s.is_empty())
    }

    /// Command tokens after the program name.
    #[must_use]
    pub fn base_args(&self) -> &[String] {
        self.cmd.get(1..).unwrap_or_default()
    }
}

/// Whether `id` can be joined onto the workspace as exactly one directory.
#[must_use]
pub fn is_valid_service_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
}

/// Static configuration of one logical service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDefinition {
    pub id: String,
    pub default_port: u16,
    pub binary: BinaryDescriptor,
}

/// One entry of the services file. The id defaults to the map key.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub default_port: u16,
    pub binary: BinaryDescriptor,
}

/// Immutable lookup table of every known service.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: BTreeMap<String, ServiceDefinition>,
}

impl ServiceRegistry {
    /// Build a registry from services-file entries keyed by service id.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is not a single path segment, an entry has
    /// no command, or an entry declares an id that differs from its key.
    pub fn from_entries(entries: BTreeMap<String, ServiceEntry>) -> Result<Self> {
        let mut services = BTreeMap::new();
        for (key, entry) in entries {
            if !is_valid_service_id(&key) {
                return Err(ConfigError::InvalidServiceId(key).into());
            }
            let id = entry.id.unwrap_or_else(|| key.clone());
            if id != key {
                return Err(ConfigError::IdMismatch { key, id }.into());
            }
            if entry.binary.program_name().is_none() {
                return Err(ConfigError::EmptyCommand(id).into());
            }
            services.insert(
                key,
                ServiceDefinition {
                    id,
                    default_port: entry.default_port,
                    binary: entry.binary,
                },
            );
        }
        Ok(Self { services })
    }

    /// Build a registry directly from definitions (used by tests and tooling).
    #[must_use]
    pub fn from_definitions(defs: impl IntoIterator<Item = ServiceDefinition>) -> Self {
        Self {
            services: defs.into_iter().map(|d| (d.id.clone(), d)).collect(),
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ServiceDefinition> {
        self.services.get(id)
    }

    /// All services, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.services.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
