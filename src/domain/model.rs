use std::fmt;
use std::path::PathBuf;

use url::Url;

use super::AppError;

/// The two media references a page must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Cover,
    Audio,
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataField::Cover => f.write_str("Cover image"),
            MetadataField::Audio => f.write_str("Audio file"),
        }
    }
}

/// Values pulled out of the page's metadata tags.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetadata {
    /// Shaped song name (already truncated at `|`), not yet sanitized.
    pub title: String,
    pub cover_url: Url,
    pub audio_url: Url,
}

#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub base_name: String,
    pub cover_url: Url,
    pub cover_path: PathBuf,
    pub audio_url: Url,
    pub audio_path: PathBuf,
}

/// Result of a single file download. Failures never escape as `Err`.
#[derive(Debug, Clone)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    Failed(AppError),
}

impl DownloadOutcome {
    pub fn into_result(self) -> Result<PathBuf, AppError> {
        match self {
            DownloadOutcome::Saved(path) => Ok(path),
            DownloadOutcome::Failed(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOutcome {
    pub cover_path: PathBuf,
    pub audio_path: PathBuf,
}
