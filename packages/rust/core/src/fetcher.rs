//! Sequential image downloader.
//!
//! Each entry is fetched and written before the next one starts. The first
//! failure stops the batch; files written before it stay on disk.

use std::path::{Path, PathBuf};

use reqwest::Client;
use sheetsync_shared::{DownloadEntry, Result, SheetSyncError};
use tracing::{debug, instrument};

use crate::pipeline::ProgressReporter;

/// Downloads plan entries into a directory as `{stem}.png`.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create `output_dir` and write every entry into it, in order.
    ///
    /// Returns the written paths. A later entry with the same stem as an
    /// earlier one overwrites its file.
    #[instrument(skip_all, fields(output_dir = %output_dir.display(), entries = entries.len()))]
    pub async fn download_images(
        &self,
        entries: &[DownloadEntry],
        output_dir: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| SheetSyncError::io(output_dir, e))?;

        let total = entries.len();
        let mut written = Vec::with_capacity(total);

        for (i, entry) in entries.iter().enumerate() {
            let bytes = self.fetch(&entry.url).await?;

            let path = output_dir.join(entry.file_name());
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| SheetSyncError::io(&path, e))?;

            debug!(url = %entry.url, path = %path.display(), bytes = bytes.len(), "image saved");
            progress.image_saved(&path, i + 1, total);
            written.push(path);
        }

        Ok(written)
    }

    /// GET `url` and return the raw body.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SheetSyncError::Network(format!("{url}: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetSyncError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            SheetSyncError::Network(format!("{url}: failed to read body: {}", e.without_url()))
        })?;

        Ok(body.to_vec())
    }
}
