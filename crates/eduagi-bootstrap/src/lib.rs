//! `EduAGI` frontend bootstrap
//!
//! Prepares a frontend checkout and runs its development server: writes a
//! default `package.json` when missing, installs dependencies when
//! `node_modules` is missing, then supervises the dev server and mirrors its
//! exit code.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod command;
pub mod error;
pub mod install;
pub mod launch;
pub mod manifest;

pub use command::CommandLine;
pub use error::{BootstrapError, Result};
pub use install::ensure_dependencies;
pub use launch::{exit_code, run_dev_server};
pub use manifest::{ProjectManifest, ensure_manifest};

use std::path::Path;

/// What to run and which steps to skip
#[derive(Debug, Clone)]
pub struct BootstrapPlan {
    /// Dependency install command
    pub install: CommandLine,
    /// Dev server command
    pub dev: CommandLine,
    /// Leave `package.json` alone even when missing
    pub skip_manifest: bool,
    /// Never run the install command
    pub skip_install: bool,
}

/// Prepare `project_dir` and run the dev server; returns the exit code to use
///
/// # Errors
///
/// Returns an error if preparation fails or the dev server cannot be started.
/// The dev server is not started after a failed install.
pub async fn run(project_dir: &Path, plan: &BootstrapPlan) -> Result<i32> {
    if !plan.skip_manifest {
        ensure_manifest(project_dir)?;
    }
    if !plan.skip_install {
        ensure_dependencies(project_dir, &plan.install).await?;
    }
    run_dev_server(project_dir, &plan.dev).await
}
