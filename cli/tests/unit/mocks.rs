//! Shared mock infrastructure for unit tests.
//!
//! Each mock records what the application layer asked of it so tests can
//! assert on side effects without touching the network or spawning processes.

#![allow(clippy::expect_used, dead_code)]

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use svcman_cli::application::ports::{
    ArtifactRepository, DownloadProgress, HealthProbe, LaunchSpec, Ledger, LocalFs,
    ProcessSpawner, ProgressReporter,
};
use svcman_cli::application::services::service_start::{
    ManagerPorts, ManagerSettings, ServiceManager,
};
use svcman_cli::domain::service::BinaryDescriptor;
use svcman_cli::domain::{
    InstallRecord, ProgressEvent, RuntimeStateRecord, ServiceDefinition, ServiceRegistry,
};
use svcman_cli::infra::fs::LocalFs as RealFs;

pub const REPO: &str = "https://repo.example/releases";

// ── Registry ──────────────────────────────────────────────────────────────────

pub fn auth_service() -> ServiceDefinition {
    ServiceDefinition {
        id: "AUTH".into(),
        default_port: 8500,
        binary: BinaryDescriptor {
            artifact: "auth".into(),
            group_id: "com/example".into(),
            cmd: vec!["./bin/auth".into(), "-J-Xmx256m".into()],
        },
    }
}

pub fn registry() -> ServiceRegistry {
    ServiceRegistry::from_definitions([auth_service()])
}

// ── Ledger ────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryLedger {
    pub installs: Mutex<HashMap<PathBuf, InstallRecord>>,
    pub states: Mutex<HashMap<PathBuf, RuntimeStateRecord>>,
    pub fail_state_save: bool,
}

impl MemoryLedger {
    pub fn failing_state_save() -> Self {
        Self {
            fail_state_save: true,
            ..Self::default()
        }
    }

    pub fn install(&self, dir: &Path) -> Option<InstallRecord> {
        self.installs.lock().expect("lock").get(dir).cloned()
    }

    pub fn state(&self, dir: &Path) -> Option<RuntimeStateRecord> {
        self.states.lock().expect("lock").get(dir).cloned()
    }
}

impl Ledger for MemoryLedger {
    async fn load_install(&self, install_dir: &Path) -> Result<Option<InstallRecord>> {
        Ok(self.install(install_dir))
    }

    async fn save_install(&self, install_dir: &Path, record: &InstallRecord) -> Result<()> {
        self.installs
            .lock()
            .expect("lock")
            .insert(install_dir.to_path_buf(), record.clone());
        Ok(())
    }

    async fn load_state(&self, install_dir: &Path) -> Result<Option<RuntimeStateRecord>> {
        Ok(self.state(install_dir))
    }

    async fn save_state(&self, install_dir: &Path, state: &RuntimeStateRecord) -> Result<()> {
        if self.fail_state_save {
            anyhow::bail!("disk full");
        }
        self.states
            .lock()
            .expect("lock")
            .insert(install_dir.to_path_buf(), state.clone());
        Ok(())
    }
}

// ── Artifact repository ───────────────────────────────────────────────────────

/// Serves a fixed latest version and "unpacks" by creating
/// `<dest>/<artifact>-<version>/bin` on the real filesystem.
#[derive(Default)]
pub struct FakeRepository {
    pub latest: Option<String>,
    pub fail_fetch: bool,
    pub metadata_calls: AtomicUsize,
    pub fetched_urls: Mutex<Vec<String>>,
}

impl FakeRepository {
    pub fn with_latest(version: &str) -> Self {
        Self {
            latest: Some(version.to_string()),
            ..Self::default()
        }
    }

    pub fn failing_fetch() -> Self {
        Self {
            latest: Some("1.0.0".into()),
            fail_fetch: true,
            ..Self::default()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched_urls.lock().expect("lock").len()
    }

    pub fn metadata_count(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

impl ArtifactRepository for FakeRepository {
    async fn latest_version(&self, _metadata_url: &str) -> Result<String> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.latest
            .clone()
            .ok_or_else(|| anyhow::anyhow!("metadata request failed: HTTP 404"))
    }

    async fn fetch_and_unpack(
        &self,
        url: &str,
        dest: &Path,
        progress: &DownloadProgress<'_>,
    ) -> Result<PathBuf> {
        self.fetched_urls.lock().expect("lock").push(url.to_string());
        if self.fail_fetch {
            anyhow::bail!("Download failed: HTTP 500 for {url}");
        }
        progress.update(0, Some(200));
        progress.update(100, Some(200));
        progress.update(200, Some(200));

        let name = url
            .rsplit('/')
            .next()
            .and_then(|f| f.strip_suffix(".tgz"))
            .unwrap_or("service");
        let service_dir = dest.join(name);
        std::fs::create_dir_all(service_dir.join("bin"))?;
        Ok(service_dir)
    }
}

// ── Health probe ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeHealth {
    pub healthy: bool,
    pub probed: Mutex<Vec<u16>>,
}

impl FakeHealth {
    pub fn up() -> Self {
        Self {
            healthy: true,
            ..Self::default()
        }
    }
}

impl HealthProbe for FakeHealth {
    async fn is_healthy(&self, port: u16) -> bool {
        self.probed.lock().expect("lock").push(port);
        self.healthy
    }
}

// ── Process spawner ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnCall {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

#[derive(Default)]
pub struct RecordingSpawner {
    pub fail: bool,
    pub calls: Mutex<Vec<SpawnCall>>,
}

impl RecordingSpawner {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SpawnCall> {
        self.calls.lock().expect("lock").clone()
    }
}

impl ProcessSpawner for RecordingSpawner {
    fn spawn(&self, spec: LaunchSpec<'_>) -> Result<u32> {
        self.calls.lock().expect("lock").push(SpawnCall {
            program: spec.program.to_path_buf(),
            args: spec.args.to_vec(),
            cwd: spec.cwd.to_path_buf(),
        });
        if self.fail {
            anyhow::bail!("No such file or directory (os error 2)");
        }
        Ok(4242)
    }
}

// ── Progress reporter ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().expect("lock").clone()
    }

    pub fn states(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.state).collect()
    }

    pub fn last(&self) -> Option<ProgressEvent> {
        self.events().last().cloned()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().expect("lock").push(event);
    }
}

// ── Filesystem ────────────────────────────────────────────────────────────────

/// Records every call and succeeds without touching disk.
#[derive(Default)]
pub struct RecordingFs {
    pub existing: bool,
    pub calls: Mutex<Vec<String>>,
}

impl RecordingFs {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, op: &str, path: &Path) {
        self.calls
            .lock()
            .expect("lock")
            .push(format!("{op} {}", path.display()));
    }
}

impl LocalFs for RecordingFs {
    fn exists(&self, path: &Path) -> bool {
        self.record("exists", path);
        self.existing
    }
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.record("create_dir_all", path);
        Ok(())
    }
    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.record("remove_dir_all", path);
        Ok(())
    }
    fn remove_file(&self, path: &Path) -> Result<()> {
        self.record("remove_file", path);
        Ok(())
    }
    fn create_file(&self, path: &Path) -> Result<File> {
        self.record("create_file", path);
        anyhow::bail!("RecordingFs cannot create real files")
    }
}

// ── Manager ───────────────────────────────────────────────────────────────────

pub type TestManager =
    ServiceManager<RealFs, MemoryLedger, FakeRepository, FakeHealth, RecordingSpawner>;

pub fn manager(
    workspace: &Path,
    ledger: MemoryLedger,
    repository: FakeRepository,
    health: FakeHealth,
    spawner: RecordingSpawner,
) -> TestManager {
    ServiceManager::new(
        registry(),
        ManagerSettings {
            repository_url: REPO.into(),
            workspace: workspace.to_path_buf(),
        },
        ManagerPorts {
            fs: RealFs,
            ledger,
            repository,
            health,
            spawner,
        },
    )
}

pub fn default_manager(workspace: &Path, repository: FakeRepository) -> TestManager {
    manager(
        workspace,
        MemoryLedger::default(),
        repository,
        FakeHealth::default(),
        RecordingSpawner::default(),
    )
}
