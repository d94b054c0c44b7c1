//! Infrastructure implementation of the `Ledger` port.
//!
//! `FileLedger` keeps each record as a JSON file inside the install directory
//! it describes. Load/save run on `tokio::task::spawn_blocking` with atomic
//! write (temp file + rename) to prevent record corruption.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use svcman_common::{INSTALL_FILENAME, InstallRecord, RuntimeStateRecord, STATE_FILENAME};

use crate::application::ports::Ledger;

/// File-backed ledger — implements `Ledger` for the infra layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLedger;

impl FileLedger {
    /// Synchronous load — used internally via `spawn_blocking`.
    fn load_sync<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading ledger file {}", path.display()))?;
        let record = serde_json::from_str(&content)
            .with_context(|| format!("parsing ledger file {}", path.display()))?;
        Ok(Some(record))
    }

    /// Synchronous save — used internally via `spawn_blocking`.
    fn save_sync<T: Serialize>(path: &Path, record: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(record).context("serializing ledger record")?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;
        std::fs::rename(&temp_path, path)
            .with_context(|| format!("finalizing ledger file {}", path.display()))?;
        Ok(())
    }

    async fn load<T>(path: PathBuf) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .context("ledger load task panicked")?
    }

    async fn save<T>(path: PathBuf, record: T) -> Result<()>
    where
        T: Serialize + Send + 'static,
    {
        tokio::task::spawn_blocking(move || Self::save_sync(&path, &record))
            .await
            .context("ledger save task panicked")?
    }
}

impl Ledger for FileLedger {
    async fn load_install(&self, install_dir: &Path) -> Result<Option<InstallRecord>> {
        Self::load(install_dir.join(INSTALL_FILENAME)).await
    }

    async fn save_install(&self, install_dir: &Path, record: &InstallRecord) -> Result<()> {
        Self::save(install_dir.join(INSTALL_FILENAME), record.clone()).await
    }

    async fn load_state(&self, install_dir: &Path) -> Result<Option<RuntimeStateRecord>> {
        Self::load(install_dir.join(STATE_FILENAME)).await
    }

    async fn save_state(&self, install_dir: &Path, state: &RuntimeStateRecord) -> Result<()> {
        Self::save(install_dir.join(STATE_FILENAME), state.clone()).await
    }
}
