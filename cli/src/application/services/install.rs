//! Application service — install a versioned artifact into an install directory.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use svcman_common::PLACEHOLDER_DIGEST;

use crate::application::ports::{
    ArtifactRepository, DownloadProgress, Ledger, LocalFs, ProgressReporter,
};
use crate::domain::artifact;
use crate::domain::progress::{ProgressEvent, STATE_INIT};
use crate::domain::{InstallRecord, ServiceDefinition, StartError};

/// Inputs for a single install.
pub struct InstallRequest<'a> {
    /// Absolute install directory; wiped before the download.
    pub install_dir: &'a Path,
    pub service: &'a ServiceDefinition,
    pub version: &'a str,
    pub repository_url: &'a str,
}

/// Wipe `install_dir` and recreate it empty.
///
/// # Panics
///
/// Panics if `install_dir` is relative. A relative path here means the
/// configuration is broken, and a recursive delete must never run against it.
///
/// # Errors
///
/// Returns an error if the directory cannot be removed or recreated.
pub fn remove_existing_versions(fs: &impl LocalFs, install_dir: &Path) -> Result<()> {
    assert!(
        install_dir.is_absolute(),
        "refusing to wipe non-absolute install directory {}",
        install_dir.display()
    );
    if fs.exists(install_dir) {
        fs.remove_dir_all(install_dir)?;
    }
    fs.create_dir_all(install_dir)
}

/// Replace whatever is in the install directory with `version` of `service`.
///
/// Emits `Init` at 0% once the directory is clean, then download progress
/// through the repository. The resulting record is persisted before returning.
///
/// # Panics
///
/// Panics if `req.install_dir` is relative (see [`remove_existing_versions`]).
///
/// # Errors
///
/// Returns [`StartError::Io`] if the directory cannot be reset,
/// [`StartError::Download`] if fetching or unpacking fails, and
/// [`StartError::Persist`] if the ledger write fails.
pub async fn install_service(
    fs: &impl LocalFs,
    ledger: &impl Ledger,
    repository: &impl ArtifactRepository,
    reporter: &impl ProgressReporter,
    req: InstallRequest<'_>,
) -> Result<InstallRecord> {
    let InstallRequest {
        install_dir,
        service,
        version,
        repository_url,
    } = req;

    remove_existing_versions(fs, install_dir).map_err(|source| {
        StartError::io(
            format!("failed to reset install directory {}", install_dir.display()),
            source,
        )
    })?;

    reporter.report(ProgressEvent::new(&service.id, Some(0), STATE_INIT));

    let url = artifact::download_url(repository_url, &service.binary, version);
    tracing::info!(service = %service.id, %version, %url, "downloading artifact");

    let progress = DownloadProgress::new(&service.id, reporter);
    let service_dir = repository
        .fetch_and_unpack(&url, install_dir, &progress)
        .await
        .map_err(|source| StartError::Download {
            dir: install_dir.to_path_buf(),
            source,
        })?;

    let record = InstallRecord {
        service: service.id.clone(),
        artifact: service.binary.artifact.clone(),
        version: version.to_string(),
        path: service_dir,
        md5sum: PLACEHOLDER_DIGEST.to_string(),
        created: Utc::now(),
    };

    ledger
        .save_install(install_dir, &record)
        .await
        .map_err(|source| StartError::Persist {
            record: "install record",
            dir: install_dir.to_path_buf(),
            source,
        })?;

    tracing::info!(service = %service.id, %version, path = %record.path.display(), "installed");
    Ok(record)
}
