//! Artifact repository over HTTP — implements `ArtifactRepository`.
//!
//! Version metadata is a small document fetched with `ureq` on a blocking
//! thread. Archives are streamed with `reqwest` so progress can be reported
//! per chunk, then unpacked on a blocking thread.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{ArtifactRepository, DownloadProgress};
use crate::domain::artifact::parse_latest_version;
use crate::domain::progress::STATE_UNPACKING;
use crate::infra::archive::unpack_tgz;

/// Timeout for version metadata requests.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(15);

/// Connect timeout for artifact downloads. The transfer itself is unbounded.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Name of the in-progress archive inside the install directory.
const DOWNLOAD_FILENAME: &str = ".download.tgz.partial";

/// Production `ArtifactRepository` backed by an HTTP(S) repository.
pub struct HttpArtifactRepository {
    client: reqwest::Client,
}

impl HttpArtifactRepository {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialisation failure).
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("svcman/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    async fn download(&self, url: &str, dest: &Path, progress: &DownloadProgress<'_>) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?;
        let status = response.status();
        anyhow::ensure!(status.is_success(), "Download failed: HTTP {status} for {url}");

        let total = response.content_length();
        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("creating {}", dest.display()))?;

        progress.update(0, total);
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Download interrupted")?;
            file.write_all(&chunk).await.context("Download interrupted")?;
            downloaded += chunk.len() as u64;
            progress.update(downloaded, total);
        }
        file.flush().await.context("flushing downloaded archive")?;
        Ok(())
    }
}

impl ArtifactRepository for HttpArtifactRepository {
    async fn latest_version(&self, metadata_url: &str) -> Result<String> {
        let url = metadata_url.to_string();
        let body = tokio::task::spawn_blocking(move || -> Result<String> {
            let response = match ureq::get(&url).timeout(METADATA_TIMEOUT).call() {
                Ok(r) => r,
                Err(ureq::Error::Status(code, _)) => {
                    anyhow::bail!("metadata request failed: HTTP {code} for {url}")
                }
                Err(e) => return Err(e).with_context(|| format!("requesting {url}")),
            };
            response
                .into_string()
                .with_context(|| format!("reading metadata from {url}"))
        })
        .await
        .context("metadata task panicked")??;

        parse_latest_version(&body)
            .ok_or_else(|| anyhow::anyhow!("no published version listed at {metadata_url}"))
    }

    async fn fetch_and_unpack(
        &self,
        url: &str,
        dest: &Path,
        progress: &DownloadProgress<'_>,
    ) -> Result<PathBuf> {
        let archive = dest.join(DOWNLOAD_FILENAME);
        self.download(url, &archive, progress).await?;

        progress.stage(STATE_UNPACKING);
        let (archive_path, dest_path) = (archive.clone(), dest.to_path_buf());
        let service_dir =
            tokio::task::spawn_blocking(move || unpack_tgz(&archive_path, &dest_path))
                .await
                .context("unpack task panicked")??;

        if let Err(e) = tokio::fs::remove_file(&archive).await {
            tracing::warn!(path = %archive.display(), error = %e, "could not remove downloaded archive");
        }
        Ok(service_dir)
    }
}
