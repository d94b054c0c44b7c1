//! Filesystem infrastructure — implements `LocalFs` and the svcman home paths.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Production filesystem implementation of the `LocalFs` port.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl crate::application::ports::LocalFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("removing directory {}", path.display()))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).with_context(|| format!("removing file {}", path.display()))
    }

    fn create_file(&self, path: &Path) -> Result<File> {
        File::create(path).with_context(|| format!("creating file {}", path.display()))
    }
}

/// Returns the svcman home directory (`~/.svcman`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn svcman_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
        .map(|h| h.join(".svcman"))
}
