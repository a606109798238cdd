pub mod client;
pub mod metadata;
pub mod models;

pub use client::{ApiClient, Result};
pub use metadata::extract_page_metadata;
pub use models::ClientConfig;
