pub mod error;
pub mod model;

pub use error::AppError;
pub use model::{DownloadOutcome, DownloadPlan, MetadataField, PageMetadata, ScrapeOutcome};
