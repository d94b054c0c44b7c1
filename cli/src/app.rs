//! Application context — unified state passed to every command handler.
//!
//! `AppContext` bundles the output context and a `ServiceManager` wired to
//! the real infrastructure from the loaded configuration.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::services::service_start::{ManagerPorts, ManagerSettings, ServiceManager};
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::LocalFs;
use crate::infra::health::HttpHealthProbe;
use crate::infra::ledger::FileLedger;
use crate::infra::process::TokioProcessSpawner;
use crate::infra::repository::HttpArtifactRepository;
use crate::output::human::HumanRenderer;
use crate::output::OutputContext;

/// `ServiceManager` backed by the local machine.
pub type LocalServiceManager =
    ServiceManager<LocalFs, FileLedger, HttpArtifactRepository, HttpHealthProbe, TokioProcessSpawner>;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
    /// Explicit config path (`--config` / `SVCMAN_CONFIG`).
    pub config: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Service manager over the real filesystem, network, and processes.
    pub manager: LocalServiceManager,
}

impl AppContext {
    /// Load configuration and the service registry, and wire the manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the config or services file is invalid, the home
    /// directory cannot be determined, or the HTTP client cannot be built.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let store = match &flags.config {
            Some(path) => YamlConfigStore::with_path(path.clone()),
            None => YamlConfigStore::new()?,
        };
        let config = store.load()?;
        let registry = store.load_registry(&config)?;
        let workspace = store.workspace(&config)?;
        tracing::debug!(
            config = %store.path().display(),
            workspace = %workspace.display(),
            services = registry.len(),
            "configuration loaded"
        );

        let settings = ManagerSettings {
            repository_url: config.repository_url,
            workspace,
        };
        let ports = ManagerPorts {
            fs: LocalFs,
            ledger: FileLedger,
            repository: HttpArtifactRepository::new()?,
            health: HttpHealthProbe::default(),
            spawner: TokioProcessSpawner,
        };

        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            mode,
            manager: ServiceManager::new(registry, settings, ports),
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Human renderer over this context's output.
    #[must_use]
    pub fn human(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }
}

/// Install the global tracing subscriber. `RUST_LOG` wins; otherwise
/// `--verbose` selects `debug` and the default is `warn`. Logs go to stderr.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
