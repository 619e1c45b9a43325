use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vmdk_sanity::{Report, SanityConfig, SanityError, connect_all, sanity};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    match execute(&config).await {
        Ok(report) if report.passed() => {
            log::info!("{}", report);
            ExitCode::SUCCESS
        }
        Ok(report) => {
            log::error!("{}", report);
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("Sanity run aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(config: &SanityConfig) -> Result<Report, SanityError> {
    let endpoints = connect_all(
        &config.endpoints,
        config.api_version.as_deref(),
        config.timeout_secs,
    )
    .await?;

    sanity::run(config, &endpoints).await
}
