use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::app::app;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::services::UserService;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "directory-api")]
#[command(about = "Community directory API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides API_PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Apply the bootstrap schema and create the first superuser")]
    InitDb,
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::InitDb => init_db(config).await,
    }
}

async fn serve(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    config.validate()?;
    let port = port.unwrap_or(config.api.port);
    info!("Starting directory API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect_lazy(&config)?;
    let router = app(AppState::new(pool, config));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn init_db(config: AppConfig) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect_lazy(&config)?;
    DatabaseManager::init_schema(&pool).await?;

    let created = UserService::new(pool.clone())
        .ensure_first_superuser(&config.security)
        .await
        .context("failed to create first superuser")?;
    if created {
        info!("Created superuser {}", config.security.first_superuser_email);
    } else {
        info!("Superuser {} already exists", config.security.first_superuser_email);
    }

    DatabaseManager::close(&pool).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::parse_from(["directory-api"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_serve_port_and_init_db() {
        let cli = Cli::parse_from(["directory-api", "serve", "--port", "9000"]);
        assert!(matches!(cli.command, Some(Commands::Serve { port: Some(9000) })));

        let cli = Cli::parse_from(["directory-api", "init-db"]);
        assert!(matches!(cli.command, Some(Commands::InitDb)));
    }
}
