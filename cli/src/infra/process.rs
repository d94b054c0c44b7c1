//! Infrastructure implementation of the `ProcessSpawner` port.
//!
//! `TokioProcessSpawner` starts the service and returns as soon as the OS has
//! created the process. The child handle is dropped without killing it; the
//! service outlives svcman.

use std::process::Stdio;

use anyhow::{Context, Result};

use crate::application::ports::{LaunchSpec, ProcessSpawner};

/// Production `ProcessSpawner` — uses tokio for process creation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessSpawner;

impl ProcessSpawner for TokioProcessSpawner {
    fn spawn(&self, spec: LaunchSpec<'_>) -> Result<u32> {
        let LaunchSpec {
            program,
            args,
            cwd,
            log,
        } = spec;
        let stderr = log.try_clone().context("duplicating log file handle")?;

        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(stderr))
            .kill_on_drop(false);
        // Own process group so a Ctrl-C aimed at svcman does not reach the service.
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn {}", program.display()))?;
        child
            .id()
            .ok_or_else(|| anyhow::anyhow!("{} exited before its pid was read", program.display()))
    }
}
