mod api;
mod application;
mod cli;
mod domain;
mod logging;
mod utils;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::task::JoinError;
use tracing::error;

use crate::api::ApiClient;
use crate::application::DownloadCoordinator;
use crate::cli::Cli;
use crate::domain::ScrapeOutcome;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version are not failures
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init_logging(cli.verbose);

    // A panic inside the pipeline surfaces here as a JoinError.
    ExitCode::from(report(tokio::spawn(run(cli)).await))
}

/// Print the saved paths or log the terminal failure once; returns the exit status.
fn report(result: std::result::Result<Result<ScrapeOutcome>, JoinError>) -> u8 {
    match result {
        Ok(Ok(outcome)) => {
            println!("Files saved as:");
            println!("- {}", outcome.cover_path.display());
            println!("- {}", outcome.audio_path.display());
            0
        }
        Ok(Err(err)) => {
            error!("{:#}", err);
            1
        }
        Err(join_err) => {
            error!(error = %join_err, "Unhandled failure");
            1
        }
    }
}

async fn run(cli: Cli) -> Result<ScrapeOutcome> {
    let output_dir = match &cli.output_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    let api_client = ApiClient::new(cli.client_config())?;
    let coordinator = DownloadCoordinator::new(api_client);

    let outcome = coordinator.scrape(&cli.url, &output_dir).await?;
    Ok(outcome)
}
