//! DaemonLib License Server
//!
//! Validates license keys against a static table, hands out short-lived
//! signed tokens, and verifies those tokens on request.
//!
//! Usage:
//!   daemonlib-server --config daemonlib.json --port 8000
//!
//! The server holds no session state; every token is self-contained.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use anyhow::{Context, Result};
use clap::Parser;
use daemonlib_license::LicenseConfig;
use daemonlib_server::{build_router, AppState, RateLimits};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "daemonlib-server")]
#[command(about = "DaemonLib license authentication server")]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "daemonlib.json")]
    config: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP port
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Token signing secret, overriding the one in the config file
    #[arg(long, env = "DAEMONLIB_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Requests per minute per client on /auth (0 disables)
    #[arg(long, default_value = "5")]
    auth_limit: u32,

    /// Requests per minute per client on /verify (0 disables)
    #[arg(long, default_value = "10")]
    verify_limit: u32,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn limit(per_minute: u32) -> Option<u32> {
    (per_minute > 0).then_some(per_minute)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("DaemonLib license server starting...");
    let mut config = LicenseConfig::load(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    if let Some(secret) = args.secret {
        config = config.with_secret(secret);
        config.validate().context("Invalid secret override")?;
    }

    let state = Arc::new(AppState::from_config(&config));
    drop(config);
    let window = state.registry.window();
    info!(
        "Loaded {} license keys, window {} + {} days (expires {})",
        state.registry.len(),
        window.start().date_naive(),
        window.valid_days(),
        window.expiry().date_naive()
    );

    let limits = RateLimits {
        auth_per_minute: limit(args.auth_limit),
        verify_per_minute: limit(args.verify_limit),
    };
    let app = build_router(state, limits);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP API listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed")?;

    info!("DaemonLib license server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
