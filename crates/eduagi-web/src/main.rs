//! Development server for the `EduAGI` frontend
//!
//! Serves the built frontend and forwards API calls to the backend.

#![forbid(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use eduagi_core::Config;
use eduagi_web::build_app;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

/// Command line interface for the dev server
#[derive(Parser)]
#[command(
    name = "eduagi-web-server",
    version = env!("CARGO_PKG_VERSION"),
    about = "Development server for the EduAGI frontend"
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "EDUAGI_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the built frontend
    #[arg(long, value_name = "DIR")]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}, using defaults");
            Config::default()
        }),
    };
    if let Some(host) = cli.host {
        config.dev_server.host = host;
    }
    if let Some(port) = cli.port {
        config.dev_server.port = port;
    }
    if let Some(static_dir) = cli.static_dir {
        config.dev_server.static_dir = static_dir;
    }

    eduagi_core::init_logging(&config.logging);
    if let Err(e) = dotenv {
        warn!(".env file not loaded: {}", e);
    }

    let host: IpAddr = config
        .dev_server
        .host
        .parse()
        .with_context(|| format!("Invalid dev server host '{}'", config.dev_server.host))?;
    let addr = SocketAddr::new(host, config.dev_server.port);

    for rule in &config.dev_server.proxy {
        info!(prefix = %rule.prefix, target = %rule.target, "proxy rule");
    }
    if !config.dev_server.static_dir.is_dir() {
        warn!(
            "Static directory {} does not exist; only proxied paths will work",
            config.dev_server.static_dir.display()
        );
    }

    let app = build_app(config.dev_server.clone())?;

    info!("Starting EduAGI dev server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, shutting down gracefully");
            }
        })
        .await?;

    Ok(())
}
