//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};

use anyhow::Result;

use crate::domain::progress::{self, ProgressEvent};
use crate::domain::{InstallRecord, RuntimeStateRecord};

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Fire-and-forget sink for progress events. Implementations must never block
/// and must tolerate a consumer that has gone away. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit one progress event.
    fn report(&self, event: ProgressEvent);
}

/// Byte-level download progress for one service, translated into percent
/// events. Only emits when the whole-number percentage changes.
pub struct DownloadProgress<'a> {
    service: &'a str,
    reporter: &'a dyn ProgressReporter,
    last: AtomicU8,
}

const NO_PERCENT: u8 = u8::MAX;

impl<'a> DownloadProgress<'a> {
    #[must_use]
    pub fn new(service: &'a str, reporter: &'a dyn ProgressReporter) -> Self {
        Self {
            service,
            reporter,
            last: AtomicU8::new(NO_PERCENT),
        }
    }

    /// Record that `downloaded` of `total` bytes have arrived.
    pub fn update(&self, downloaded: u64, total: Option<u64>) {
        let Some(pct) = progress::percent_of(downloaded, total) else {
            return;
        };
        if self.last.swap(pct, Ordering::Relaxed) != pct {
            self.reporter.report(ProgressEvent::new(
                self.service,
                Some(pct),
                progress::STATE_DOWNLOADING,
            ));
        }
    }

    /// Emit a state change that carries no percentage, e.g. unpacking.
    pub fn stage(&self, state: &str) {
        self.reporter
            .report(ProgressEvent::new(self.service, None, state));
    }
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Abstracts raw filesystem operations used by the install and launch steps.
pub trait LocalFs {
    /// Whether a path exists.
    fn exists(&self, path: &Path) -> bool;
    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Recursively remove a directory.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> Result<()>;
    /// Create (or truncate) a file for writing.
    fn create_file(&self, path: &Path) -> Result<File>;
}

// ── Ledger Port ───────────────────────────────────────────────────────────────

/// Persists install and runtime-state records, keyed by install directory.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    /// Load the install record, returning `None` if none exists.
    async fn load_install(&self, install_dir: &Path) -> Result<Option<InstallRecord>>;
    /// Persist the install record, replacing any previous one.
    async fn save_install(&self, install_dir: &Path, record: &InstallRecord) -> Result<()>;
    /// Load the runtime state record, returning `None` if none exists.
    async fn load_state(&self, install_dir: &Path) -> Result<Option<RuntimeStateRecord>>;
    /// Persist the runtime state record, replacing any previous one.
    async fn save_state(&self, install_dir: &Path, state: &RuntimeStateRecord) -> Result<()>;
}

// ── Artifact Repository Port ──────────────────────────────────────────────────

/// Remote artifact repository: version lookup and download + unpack.
#[allow(async_fn_in_trait)]
pub trait ArtifactRepository {
    /// Fetch the metadata document at `metadata_url` and return the latest
    /// published version.
    async fn latest_version(&self, metadata_url: &str) -> Result<String>;

    /// Download the archive at `url` and unpack it into `dest`.
    ///
    /// Returns the unpacked service directory inside `dest`.
    async fn fetch_and_unpack(
        &self,
        url: &str,
        dest: &Path,
        progress: &DownloadProgress<'_>,
    ) -> Result<PathBuf>;
}

// ── Health Port ───────────────────────────────────────────────────────────────

/// Abstracts the "is something already serving on this port" check.
#[allow(async_fn_in_trait)]
pub trait HealthProbe {
    /// True when a healthy service answers on `port`.
    async fn is_healthy(&self, port: u16) -> bool;
}

// ── Process Port ──────────────────────────────────────────────────────────────

/// Everything needed to spawn a service process.
pub struct LaunchSpec<'a> {
    /// Absolute path of the executable.
    pub program: &'a Path,
    pub args: &'a [String],
    /// Working directory (the service directory).
    pub cwd: &'a Path,
    /// Destination for both stdout and stderr.
    pub log: File,
}

/// Spawns a detached child process.
pub trait ProcessSpawner {
    /// Spawn the process and return its pid once the spawn has succeeded.
    /// Must not wait for the process to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn spawn(&self, spec: LaunchSpec<'_>) -> Result<u32>;
}
