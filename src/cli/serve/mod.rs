//! Serve command - runs the HTTP API

use std::net::SocketAddr;

use anyhow::Context;
use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use super::logging_config;
use crate::api::create_router;
use crate::config::AppConfig;
use crate::infrastructure::observability::{init_metrics, init_tracing, shutdown_tracing};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Overrides `server.port`
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_tracing(&logging_config(&config), &config.observability.tracing);

    let state = crate::create_app_state_with_config(&config).await?;
    if config.agent.recover_interrupted_on_startup {
        state
            .agent_service
            .recover_interrupted()
            .await
            .context("Failed to recover interrupted work items")?;
    }

    let metrics = init_metrics(&config.observability.metrics);
    let app = create_router(state, metrics, &config.server.cors_allowed_origins);

    let addr = build_socket_addr(&config)?;
    info!("Starting API server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tracing();
    info!("API server shutdown complete");

    Ok(())
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    let ip = config
        .server
        .host
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid server.host '{}'", config.server.host))?;
    Ok(SocketAddr::from((ip, config.server.port)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
