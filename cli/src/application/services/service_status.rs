//! Application service — report what the ledger knows about each service.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{
    ArtifactRepository, HealthProbe, Ledger, LocalFs, ProcessSpawner,
};
use crate::application::services::service_start::ServiceManager;
use crate::domain::{InstallRecord, RuntimeStateRecord, ServiceDefinition, StartError};

/// Snapshot of one service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub id: String,
    pub default_port: u16,
    /// Current install, if the ledger has one.
    pub installed: Option<InstallRecord>,
    /// Most recent launch. Advisory: the process may have exited since.
    pub last_run: Option<RuntimeStateRecord>,
    /// Whether the health probe answered on the last-run port (or the
    /// default port when the service has never been launched).
    pub healthy: bool,
}

impl<Fs, L, R, H, S> ServiceManager<Fs, L, R, H, S>
where
    Fs: LocalFs,
    L: Ledger,
    R: ArtifactRepository,
    H: HealthProbe,
    S: ProcessSpawner,
{
    /// Status of one service, or of every registered service when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StartError::UnknownService`] for an unregistered name, or an
    /// error if a ledger record exists but cannot be read.
    pub async fn service_status(&self, name: Option<&str>) -> Result<Vec<ServiceStatus>> {
        let services: Vec<&ServiceDefinition> = match name {
            Some(n) => vec![
                self.registry()
                    .get(n)
                    .ok_or_else(|| StartError::UnknownService(n.to_string()))?,
            ],
            None => self.registry().iter().collect(),
        };

        let mut out = Vec::with_capacity(services.len());
        for service in services {
            let dir = self.install_dir(&service.id);
            let installed = self.ports().ledger.load_install(&dir).await?;
            let last_run = self.ports().ledger.load_state(&dir).await?;
            let port = last_run.as_ref().map_or(service.default_port, |s| s.port);
            let healthy = self.ports().health.is_healthy(port).await;
            out.push(ServiceStatus {
                id: service.id.clone(),
                default_port: service.default_port,
                installed,
                last_run,
                healthy,
            });
        }
        Ok(out)
    }
}
