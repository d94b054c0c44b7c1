//! Command-line assembly for launched services.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::service::ServiceDefinition;

/// Marker left in a service directory by a service that was killed uncleanly.
pub const RUNNING_PID_FILENAME: &str = "RUNNING_PID";

/// Log directory name inside a service directory.
pub const LOG_DIRNAME: &str = "logs";

/// Combined stdout/stderr file inside the log directory.
pub const STDOUT_LOG_FILENAME: &str = "stdout.log";

/// Directory holding executables inside an unpacked service.
pub const BIN_DIRNAME: &str = "bin";

/// Port the service binds: an override if positive, else the service default.
#[must_use]
pub fn resolve_port(service: &ServiceDefinition, override_port: Option<u16>) -> u16 {
    override_port
        .filter(|p| *p > 0)
        .unwrap_or(service.default_port)
}

/// Arguments generated for every launch, in the order the service expects.
#[must_use]
pub fn system_args(service_id: &str, version: &str, service_dir: &Path, port: u16) -> Vec<String> {
    vec![
        format!("-Dservice.manager.serviceName={service_id}"),
        format!("-Dservice.manager.runFrom={version}"),
        format!("-Duser.home={}", service_dir.join("..").display()),
        format!("-Dhttp.port={port}"),
    ]
}

/// Full argument list: base command tokens (program excluded), then
/// generated system args, then any extra args configured for this service.
#[must_use]
pub fn assemble_args(
    service: &ServiceDefinition,
    version: &str,
    service_dir: &Path,
    port: u16,
    extra_args: &HashMap<String, Vec<String>>,
) -> Vec<String> {
    let mut args = service.binary.base_args().to_vec();
    args.extend(system_args(&service.id, version, service_dir, port));
    if let Some(extra) = extra_args.get(&service.id) {
        args.extend(extra.iter().cloned());
    }
    args
}

/// Executable path: the program basename resolved against `<service_dir>/bin`.
#[must_use]
pub fn executable_path(service_dir: &Path, program_name: &str) -> PathBuf {
    service_dir.join(BIN_DIRNAME).join(program_name)
}
