//! Command-line surface.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::api::ClientConfig;

#[derive(Debug, Parser)]
#[command(name = "simple-suno-downloader", version)]
#[command(about = "Download the cover image and audio file of a song page", long_about = None)]
pub struct Cli {
    /// Song page URL; its og:image and og:audio tags are downloaded.
    pub url: String,

    /// Directory to save into (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// User-Agent sent with media downloads.
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig {
            timeout: Duration::from_secs(self.timeout),
            ..ClientConfig::default()
        };
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }
        config
    }
}
