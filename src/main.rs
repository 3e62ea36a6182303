//! HRMS engine server.
//!
//! Loads the payroll rules and serves the payroll, tax and attendance API.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hrms_engine::api::{AppState, create_router};
use hrms_engine::config::ConfigLoader;

/// Command-line arguments for the HRMS engine server.
#[derive(Parser, Debug)]
#[command(name = "hrms-engine")]
#[command(about = "Payroll, tax regime and attendance service")]
#[command(version)]
struct Args {
    /// Directory holding rules.yaml, salary_structure.yaml and regimes/
    #[arg(long, default_value = "./config/in_payroll", env = "HRMS_CONFIG_DIR")]
    config_dir: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "HRMS_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "HRMS_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hrms_engine=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let loader = ConfigLoader::load(&args.config_dir).with_context(|| {
        format!(
            "Failed to load payroll rules from {}",
            args.config_dir.display()
        )
    })?;
    let rules = loader.rules();
    info!(
        code = %rules.code,
        version = %rules.version,
        "Loaded payroll rules"
    );

    let state = AppState::new(loader).context("Failed to initialise application state")?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
