//! `.tgz` unpacking for downloaded artifacts.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

/// Unpack a gzipped tarball into `dest` and return the service directory.
///
/// The service directory is the archive's single top-level directory, or
/// `dest` itself when the archive has several top-level entries. Entries that
/// would escape `dest` are skipped and do not count as top-level entries.
///
/// # Errors
///
/// Returns an error if the archive cannot be read, is empty, or an entry
/// cannot be written.
pub fn unpack_tgz(archive: &Path, dest: &Path) -> Result<PathBuf> {
    let file = File::open(archive).with_context(|| format!("opening {}", archive.display()))?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));
    tar.set_preserve_permissions(true);

    let mut roots = BTreeSet::new();
    let entries = tar
        .entries()
        .with_context(|| format!("reading {}", archive.display()))?;
    for entry in entries {
        let mut entry = entry.with_context(|| format!("reading entry in {}", archive.display()))?;
        let path = entry.path().context("invalid entry path")?.into_owned();
        let unpacked = entry
            .unpack_in(dest)
            .with_context(|| format!("unpacking {} into {}", path.display(), dest.display()))?;
        if !unpacked {
            tracing::warn!(entry = %path.display(), "skipping archive entry outside install dir");
            continue;
        }
        if let Some(root) = top_level(&path) {
            roots.insert(root);
        }
    }

    match roots.len() {
        0 => anyhow::bail!("archive {} is empty", archive.display()),
        1 => {
            let only = roots.into_iter().next().unwrap_or_default();
            let candidate = dest.join(only);
            Ok(if candidate.is_dir() {
                candidate
            } else {
                dest.to_path_buf()
            })
        }
        _ => Ok(dest.to_path_buf()),
    }
}

/// First normal component of an archive path, ignoring `./` prefixes.
fn top_level(path: &Path) -> Option<PathBuf> {
    path.components().find_map(|c| match c {
        Component::Normal(name) => Some(PathBuf::from(name)),
        _ => None,
    })
}
