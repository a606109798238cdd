use thiserror::Error;

use super::model::MetadataField;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Invalid URL: {0}")]
    InvalidInput(String),

    #[error("Failed to fetch page: {0}")]
    Fetch(String),

    #[error("{0} URL not found")]
    MetadataMissing(MetadataField),

    #[error("Failed to download: {0}")]
    Download(String),

    #[error("Failed to write file: {0}")]
    Write(String),
}
