//! Application service — the service start use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! A start attempt moves through:
//!
//! ```text
//! Idle → HealthChecking → AlreadyRunning
//!                       → ResolvingVersion → VerifyingInstall → Reusing | Installing
//!                         → PreparingLogs → Launching → Persisted
//! ```
//!
//! and any step may end in `Failed`.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::{
    ArtifactRepository, HealthProbe, Ledger, LocalFs, ProcessSpawner, ProgressReporter,
};
use crate::application::services::install::{InstallRequest, install_service};
use crate::application::services::launch::{LaunchOptions, launch_service, reset_log_dir};
use crate::application::services::verify::verify_install;
use crate::domain::artifact;
use crate::domain::config::{self, RunOptions};
use crate::domain::progress::{
    ProgressEvent, STATE_ALREADY_RUNNING, STATE_FAILED, STATE_INSTALLING, STATE_STARTED,
    STATE_STARTING,
};
use crate::domain::{RuntimeStateRecord, ServiceDefinition, ServiceRegistry, StartError};

/// Infrastructure the service manager drives.
pub struct ManagerPorts<Fs, L, R, H, S> {
    pub fs: Fs,
    pub ledger: L,
    pub repository: R,
    pub health: H,
    pub spawner: S,
}

/// Static settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    /// Base URL of the artifact repository.
    pub repository_url: String,
    /// Root of all install directories. Expected to be absolute.
    pub workspace: PathBuf,
}

/// Installs and launches services from an immutable registry.
pub struct ServiceManager<Fs, L, R, H, S> {
    registry: ServiceRegistry,
    settings: ManagerSettings,
    ports: ManagerPorts<Fs, L, R, H, S>,
}

impl<Fs, L, R, H, S> ServiceManager<Fs, L, R, H, S>
where
    Fs: LocalFs,
    L: Ledger,
    R: ArtifactRepository,
    H: HealthProbe,
    S: ProcessSpawner,
{
    #[must_use]
    pub fn new(
        registry: ServiceRegistry,
        settings: ManagerSettings,
        ports: ManagerPorts<Fs, L, R, H, S>,
    ) -> Self {
        Self {
            registry,
            settings,
            ports,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    #[must_use]
    pub fn ports(&self) -> &ManagerPorts<Fs, L, R, H, S> {
        &self.ports
    }

    /// Install directory owned by a service.
    #[must_use]
    pub fn install_dir(&self, service_id: &str) -> PathBuf {
        config::install_dir(&self.settings.workspace, service_id)
    }

    /// Start `name`, installing `requested_version` (or the latest published
    /// version when `None`) first if the current install does not verify.
    ///
    /// Every failure emits a terminal `Failed` event before returning, except
    /// [`StartError::AlreadyRunning`], which emits `Already running` instead.
    ///
    /// # Panics
    ///
    /// Panics if an install is needed and the install directory is relative.
    ///
    /// # Errors
    ///
    /// Returns a [`StartError`] describing the step that failed.
    pub async fn start_service(
        &self,
        name: &str,
        requested_version: Option<&str>,
        opts: &RunOptions,
        reporter: &impl ProgressReporter,
    ) -> Result<RuntimeStateRecord> {
        let result = self.run_start(name, requested_version, opts, reporter).await;
        if let Err(e) = &result {
            report_failure(name, e, reporter);
        }
        result
    }

    async fn run_start(
        &self,
        name: &str,
        requested_version: Option<&str>,
        opts: &RunOptions,
        reporter: &impl ProgressReporter,
    ) -> Result<RuntimeStateRecord> {
        let Some(service) = self.registry.get(name) else {
            return Err(StartError::UnknownService(name.to_string()).into());
        };

        if self.ports.health.is_healthy(service.default_port).await {
            reporter.report(ProgressEvent::new(
                &service.id,
                Some(100),
                STATE_ALREADY_RUNNING,
            ));
            return Err(StartError::AlreadyRunning(service.id.clone()).into());
        }

        let install_dir = self.install_dir(&service.id);
        let version = match requested_version.filter(|v| !v.is_empty()) {
            Some(v) => v.to_string(),
            None if opts.offline => String::new(),
            None => self.resolve_latest(service).await?,
        };

        let existing = match self.ports.ledger.load_install(&install_dir).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(dir = %install_dir.display(), error = %e, "ignoring unreadable install record");
                None
            }
        };
        let verified = existing.as_ref().is_some_and(|r| {
            verify_install(&self.ports.fs, r, &service.id, &version, opts.offline)
        });

        let record = match existing {
            Some(record) if verified && !opts.clean => {
                tracing::debug!(service = %service.id, version = %record.version, "reusing install");
                record
            }
            _ => {
                if opts.offline {
                    return Err(StartError::Unavailable(service.id.clone()).into());
                }
                reporter.report(ProgressEvent::new(&service.id, None, STATE_INSTALLING));
                install_service(
                    &self.ports.fs,
                    &self.ports.ledger,
                    &self.ports.repository,
                    reporter,
                    InstallRequest {
                        install_dir: &install_dir,
                        service,
                        version: &version,
                        repository_url: &self.settings.repository_url,
                    },
                )
                .await?
            }
        };

        reset_log_dir(&self.ports.fs, &record.path)?;

        reporter.report(ProgressEvent::new(&service.id, Some(100), STATE_STARTING));
        let state = launch_service(
            &self.ports.fs,
            &self.ports.spawner,
            service,
            &record,
            LaunchOptions {
                override_port: opts.port,
                extra_args: &opts.extra_args,
            },
        )?;

        self.ports
            .ledger
            .save_state(&install_dir, &state)
            .await
            .map_err(|source| StartError::Persist {
                record: "runtime state",
                dir: install_dir.clone(),
                source,
            })?;

        reporter.report(ProgressEvent::new(&service.id, Some(100), STATE_STARTED));
        Ok(state)
    }

    async fn resolve_latest(&self, service: &ServiceDefinition) -> Result<String> {
        let url = artifact::metadata_url(&self.settings.repository_url, &service.binary);
        tracing::debug!(service = %service.id, %url, "resolving latest version");
        self.ports
            .repository
            .latest_version(&url)
            .await
            .map_err(|source| {
                StartError::VersionResolution {
                    service: service.id.clone(),
                    source,
                }
                .into()
            })
    }
}

/// Emit the terminal event for a failed start attempt.
fn report_failure(name: &str, err: &anyhow::Error, reporter: &impl ProgressReporter) {
    let percent = match err.downcast_ref::<StartError>() {
        Some(StartError::AlreadyRunning(_)) => return,
        Some(StartError::VersionResolution { .. } | StartError::Unavailable(_)) => Some(0),
        _ => None,
    };
    reporter.report(ProgressEvent::new(name, percent, STATE_FAILED));
}
