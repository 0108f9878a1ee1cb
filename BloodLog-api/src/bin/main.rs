use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use blood_log_api::api::{create_application, state::ReadingService as SharedService, AppState};
use blood_log_api::config::{AppConfig, CollaboratorMode};
use blood_log_data::credentials::CredentialStore;
use blood_log_data::repository::{InMemoryCollaborator, RemoteCollaborator};
use blood_log_domain::services::ReadingService;

/// Command line options; everything else comes from the environment
#[derive(Parser, Debug)]
#[command(name = "blood_log_api")]
#[command(version, about = "BloodLog API server", long_about = None)]
struct Cli {
    /// Keep readings in memory instead of calling the collaborator
    /// (overrides BLOODLOG_OFFLINE)
    #[arg(long)]
    offline: bool,
}

/// The main entry point for the BloodLog API server
///
/// This function:
/// 1. Initializes environment variables from .env file
/// 2. Sets up tracing for logging
/// 3. Restores the stored API secret from the data directory
/// 4. Connects the reading service to the collaborator
/// 5. Creates and starts the Axum web application
/// 6. Handles graceful shutdown
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    // Initialize tracing for structured logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    info!("🚀 Starting BloodLog API server");

    let config = AppConfig::from_lookup(|key| match key {
        "BLOODLOG_OFFLINE" if cli.offline => Some("true".to_string()),
        _ => std::env::var(key).ok(),
    })
    .context("Invalid configuration")?;

    if !config.data_dir.exists() {
        info!("Creating data directory: {}", config.data_dir.display());
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;
    }

    let credentials = CredentialStore::with_file(config.credential_path())
        .context("Failed to open the credential file")?;
    if credentials.is_signed_in() {
        info!("Restored previous session for {}", config.user_id);
    }

    let service: SharedService = match &config.collaborator {
        CollaboratorMode::Remote { url } => {
            let collaborator = RemoteCollaborator::new(url, config.timeout)
                .context("Failed to build the collaborator client")?;
            Arc::new(ReadingService::new(collaborator, credentials, config.user_id.clone()))
        }
        CollaboratorMode::Offline => {
            warn!("Offline mode: readings live in memory and are lost on exit");
            Arc::new(ReadingService::new(
                InMemoryCollaborator::default(),
                credentials,
                config.user_id.clone(),
            ))
        }
    };
    info!("Using collaborator {}", config.collaborator.describe());

    let state = AppState::new(service, config.tz_offset)
        .with_collaborator(config.collaborator.describe())
        .with_environment(config.environment.clone());

    // Create the Axum application with all routes and middleware
    let app = create_application(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Serve the application with graceful shutdown support
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Sets up a signal handler for graceful shutdown
///
/// Waits for CTRL+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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

    info!("Shutting down server...");
}
