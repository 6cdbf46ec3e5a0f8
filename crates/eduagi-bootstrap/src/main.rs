//! Launcher for the `EduAGI` frontend development server

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use clap::Parser;
use eduagi_bootstrap::{BootstrapPlan, CommandLine, Result};
use eduagi_core::config::LoggingConfig;
use std::path::PathBuf;
use tracing::{error, info};

/// Command line interface for the bootstrap launcher
#[derive(Parser)]
#[command(
    name = "eduagi-bootstrap",
    version = env!("CARGO_PKG_VERSION"),
    about = "Prepare and launch the EduAGI frontend dev server",
    long_about = "Writes a default package.json when missing, installs dependencies when node_modules is missing, then runs the dev server and exits with its exit code."
)]
struct Cli {
    /// Frontend project directory
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    project_dir: PathBuf,

    /// Dependency install command
    #[arg(long, env = "EDUAGI_INSTALL_COMMAND", default_value = "npm install")]
    install_command: String,

    /// Dev server command
    #[arg(long, env = "EDUAGI_DEV_COMMAND", default_value = "npm run dev")]
    dev_command: String,

    /// Do not write package.json
    #[arg(long)]
    skip_manifest: bool,

    /// Do not install dependencies
    #[arg(long)]
    skip_install: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, default_value = "pretty")]
    log_format: String,
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    eduagi_core::init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        format: cli.log_format.clone(),
    });
    if let Err(e) = dotenv {
        tracing::debug!(".env file not loaded: {}", e);
    }

    let code = match launch(&cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            1
        }
    };
    std::process::exit(code);
}

async fn launch(cli: &Cli) -> Result<i32> {
    let plan = BootstrapPlan {
        install: CommandLine::parse("install", &cli.install_command)?,
        dev: CommandLine::parse("dev", &cli.dev_command)?,
        skip_manifest: cli.skip_manifest,
        skip_install: cli.skip_install,
    };

    info!("Launching EduAGI frontend in {}", cli.project_dir.display());
    eduagi_bootstrap::run(&cli.project_dir, &plan).await
}
