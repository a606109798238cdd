use std::time::Duration;

use futures::Stream;
use futures::TryStreamExt;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::models::ClientConfig;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Server returned {0}")]
    Status(String),

    #[error("Timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the page markup with default headers.
    pub async fn fetch_page(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?
            .error_for_status()
            .map_err(|e| ApiError::Status(status_text(&e)))?;

        response.text().await.map_err(|e| self.classify(e))
    }

    /// Start a media download and hand back its body as a byte stream.
    /// Returns (content_length, stream)
    ///
    /// The timeout covers the response head only; callers bound each chunk
    /// themselves so long transfers are not cut off.
    pub async fn download_file_stream(
        &self,
        download_url: &Url,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        let request = self
            .client
            .get(download_url.clone())
            .header(USER_AGENT, &self.config.user_agent)
            .send();

        let response = tokio::time::timeout(self.config.timeout, request)
            .await
            .map_err(|_| ApiError::Timeout(self.config.timeout))??
            .error_for_status()
            .map_err(|e| ApiError::Status(status_text(&e)))?;

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok((total_size, stream))
    }

    fn classify(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.config.timeout)
        } else {
            ApiError::RequestError(e)
        }
    }
}

fn status_text(e: &reqwest::Error) -> String {
    match (e.status(), e.url()) {
        (Some(status), Some(url)) => format!("{} for {}", status, url),
        (Some(status), None) => status.to_string(),
        _ => e.to_string(),
    }
}
