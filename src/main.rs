use clap::Parser;
use tracing_subscriber::EnvFilter;

use directory_api::cli::{self, Cli};
use directory_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, SECRET_KEY, etc. are picked up
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env();

    let default_filter = if config.api.enable_request_logging {
        "info,sqlx=warn,tower_http=debug"
    } else {
        "info,sqlx=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli::run(cli, config).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
