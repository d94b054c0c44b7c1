//! Application service — spawn an installed service and describe the launch.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::{LaunchSpec, LocalFs, ProcessSpawner};
use crate::domain::error::ConfigError;
use crate::domain::launch::{
    BIN_DIRNAME, LOG_DIRNAME, RUNNING_PID_FILENAME, STDOUT_LOG_FILENAME, assemble_args,
    executable_path, resolve_port,
};
use crate::domain::{InstallRecord, RuntimeStateRecord, ServiceDefinition, StartError};

/// Caller-supplied launch settings.
#[derive(Clone, Copy)]
pub struct LaunchOptions<'a> {
    /// Port override; non-positive values fall back to the service default.
    pub override_port: Option<u16>,
    /// Extra arguments keyed by service id.
    pub extra_args: &'a HashMap<String, Vec<String>>,
}

/// Remove `<service_dir>/logs` if present and recreate it empty.
///
/// # Errors
///
/// Returns [`StartError::Io`] if the directory cannot be removed or created.
pub fn reset_log_dir(fs: &impl LocalFs, service_dir: &Path) -> Result<PathBuf> {
    let log_dir = service_dir.join(LOG_DIRNAME);
    if fs.exists(&log_dir) {
        fs.remove_dir_all(&log_dir).map_err(|source| {
            StartError::io(format!("failed to clear {}", log_dir.display()), source)
        })?;
    }
    fs.create_dir_all(&log_dir).map_err(|source| {
        StartError::io(format!("failed to create {}", log_dir.display()), source)
    })?;
    Ok(log_dir)
}

/// Best-effort removal of a pid marker left behind by an unclean shutdown.
fn remove_running_pid(fs: &impl LocalFs, service_dir: &Path) {
    let marker = service_dir.join(RUNNING_PID_FILENAME);
    if !fs.exists(&marker) {
        return;
    }
    if let Err(e) = fs.remove_file(&marker) {
        tracing::warn!(path = %marker.display(), error = %e, "could not remove stale pid marker");
    }
}

/// Spawn the service described by `record` and return its runtime state.
///
/// Does not wait for the process and does not touch the ledger.
///
/// # Errors
///
/// Returns [`StartError::Io`] if the log file cannot be opened and
/// [`StartError::Launch`] if the process cannot be spawned.
pub fn launch_service(
    fs: &impl LocalFs,
    spawner: &impl ProcessSpawner,
    service: &ServiceDefinition,
    record: &InstallRecord,
    opts: LaunchOptions<'_>,
) -> Result<RuntimeStateRecord> {
    let service_dir = record.path.as_path();
    remove_running_pid(fs, service_dir);

    let port = resolve_port(service, opts.override_port);
    let args = assemble_args(service, &record.version, service_dir, port, opts.extra_args);

    let log_dir = service_dir.join(LOG_DIRNAME);
    fs.create_dir_all(&log_dir).map_err(|source| {
        StartError::io(format!("failed to create {}", log_dir.display()), source)
    })?;
    let log_path = log_dir.join(STDOUT_LOG_FILENAME);
    let log = fs.create_file(&log_path).map_err(|source| {
        StartError::io(format!("failed to open {}", log_path.display()), source)
    })?;

    let Some(program_name) = service.binary.program_name() else {
        return Err(StartError::Launch {
            program: service_dir.join(BIN_DIRNAME),
            source: ConfigError::EmptyCommand(service.id.clone()).into(),
        }
        .into());
    };
    let program = executable_path(service_dir, program_name);

    tracing::debug!(
        program = %program.display(),
        args = %args.join(" "),
        cwd = %service_dir.display(),
        "spawning service"
    );

    let pid = spawner
        .spawn(LaunchSpec {
            program: &program,
            args: &args,
            cwd: service_dir,
            log,
        })
        .map_err(|source| StartError::Launch {
            program: program.clone(),
            source,
        })?;

    tracing::info!(service = %service.id, pid, port, "service spawned");

    Ok(RuntimeStateRecord {
        service: service.id.clone(),
        artifact: service.binary.artifact.clone(),
        version: record.version.clone(),
        path: record.path.clone(),
        md5sum: record.md5sum.clone(),
        started: Utc::now(),
        pid,
        port,
        args,
    })
}
