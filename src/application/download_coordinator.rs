use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::{stream::BoxStream, StreamExt};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    api::{extract_page_metadata, ApiClient},
    domain::{AppError, DownloadOutcome, DownloadPlan, PageMetadata, ScrapeOutcome},
    utils::{extension_of, parse_page_url, sanitize_filename, UNKNOWN_TITLE},
};

#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }

    /// Fetch the page, read its metadata and save cover and audio into `output_dir`.
    ///
    /// Steps run strictly in order and the first failure ends the run. Files
    /// already saved by earlier steps stay on disk.
    pub async fn scrape(&self, page_url: &str, output_dir: &Path) -> Result<ScrapeOutcome, AppError> {
        let page_url = parse_page_url(page_url)?;

        info!(url = %page_url, "Fetching page");
        let html = self
            .api_client
            .fetch_page(&page_url)
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        let metadata = extract_page_metadata(&html, &page_url)?;
        info!(song = %metadata.title, "Song name");

        let plan = prepare_download(metadata, output_dir);
        debug!(
            base = %plan.base_name,
            cover = %plan.cover_path.display(),
            audio = %plan.audio_path.display(),
            "Output paths"
        );

        info!(url = %plan.cover_url, "Downloading cover image");
        let cover_path = self
            .download_file(&plan.cover_url, &plan.cover_path)
            .await
            .into_result()?;

        info!(url = %plan.audio_url, "Downloading audio file");
        let audio_path = self
            .download_file(&plan.audio_url, &plan.audio_path)
            .await
            .into_result()?;

        info!("Download complete");
        Ok(ScrapeOutcome {
            cover_path,
            audio_path,
        })
    }

    /// Stream one resource to `path`.
    ///
    /// Once the destination is created, a failed transfer removes it again.
    /// A path that cannot be created is left untouched.
    pub async fn download_file(&self, url: &Url, path: &Path) -> DownloadOutcome {
        info!(url = %url, path = %path.display(), "Starting download");

        let (total, stream) = match self.api_client.download_file_stream(url).await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, error = %e, "Download request failed");
                return DownloadOutcome::Failed(AppError::Download(format!("{}: {}", url, e)));
            }
        };

        let file = match tokio::fs::File::create(path).await {
            Ok(file) => file,
            Err(e) => {
                return DownloadOutcome::Failed(AppError::Write(format!(
                    "Failed to create {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let idle_timeout = self.api_client.config().timeout;
        match write_stream(file, stream.boxed(), idle_timeout).await {
            Ok(written) => {
                debug!(written, total = ?total, "Stream finished");
                info!(path = %path.display(), "Successfully downloaded");
                DownloadOutcome::Saved(path.to_path_buf())
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "Transfer failed");
                remove_partial(path).await;
                DownloadOutcome::Failed(err)
            }
        }
    }
}

/// Derive both output paths from the page metadata.
pub fn prepare_download(metadata: PageMetadata, output_dir: &Path) -> DownloadPlan {
    let mut base_name = sanitize_filename(&metadata.title);
    if base_name.is_empty() {
        base_name = UNKNOWN_TITLE.to_string();
    }

    let cover_path: PathBuf = output_dir.join(format!(
        "{}_cover{}",
        base_name,
        extension_of(&metadata.cover_url)
    ));
    let audio_path: PathBuf =
        output_dir.join(format!("{}{}", base_name, extension_of(&metadata.audio_url)));

    DownloadPlan {
        base_name,
        cover_url: metadata.cover_url,
        cover_path,
        audio_url: metadata.audio_url,
        audio_path,
    }
}

async fn write_stream(
    mut file: tokio::fs::File,
    mut stream: BoxStream<'_, crate::api::Result<bytes::Bytes>>,
    idle_timeout: Duration,
) -> Result<u64, AppError> {
    let mut written: u64 = 0;
    loop {
        let next = tokio::time::timeout(idle_timeout, stream.next())
            .await
            .map_err(|_| {
                AppError::Download(format!(
                    "No data received for {}s",
                    idle_timeout.as_secs()
                ))
            })?;

        match next {
            Some(Ok(chunk)) => {
                file.write_all(&chunk)
                    .await
                    .map_err(|e| AppError::Write(e.to_string()))?;
                written += chunk.len() as u64;
            }
            Some(Err(e)) => return Err(AppError::Download(e.to_string())),
            None => break,
        }
    }

    file.flush()
        .await
        .map_err(|e| AppError::Write(e.to_string()))?;
    file.sync_all()
        .await
        .map_err(|e| AppError::Write(format!("Failed to sync file: {}", e)))?;

    Ok(written)
}

/// Best-effort removal of a partially written file.
async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!(path = %path.display(), "Cleaned up failed file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Could not clean up failed file"),
    }
}
