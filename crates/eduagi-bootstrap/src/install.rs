//! Dependency installation

use crate::command::CommandLine;
use crate::error::{BootstrapError, Result};
use std::path::Path;
use tracing::{error, info};

/// Directory whose presence means dependencies are installed
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Run `install` in `project_dir` unless dependencies are already present
///
/// Returns whether the install command ran.
///
/// # Errors
///
/// Returns an error if the command cannot be started or exits unsuccessfully.
pub async fn ensure_dependencies(project_dir: &Path, install: &CommandLine) -> Result<bool> {
    if project_dir.join(DEPENDENCY_DIR).exists() {
        return Ok(false);
    }

    info!("Installing dependencies with '{}'", install);
    let status = install
        .command(project_dir)
        .status()
        .await
        .map_err(|source| BootstrapError::Spawn {
            command: install.to_string(),
            source,
        })?;

    if !status.success() {
        error!("Dependency installation failed: {}", status);
        return Err(BootstrapError::InstallFailed {
            command: install.to_string(),
            code: status.code(),
        });
    }

    info!("Dependencies installed");
    Ok(true)
}

#[cfg(all(test, unix))]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_skips_when_installed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(DEPENDENCY_DIR)).unwrap();

        // Would fail if it ran
        let install = CommandLine::parse("install", "false").unwrap();
        assert!(!ensure_dependencies(dir.path(), &install).await.unwrap());
    }

    #[tokio::test]
    async fn test_runs_in_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let install = CommandLine::parse("install", "mkdir node_modules").unwrap();

        assert!(ensure_dependencies(dir.path(), &install).await.unwrap());
        assert!(dir.path().join(DEPENDENCY_DIR).is_dir());
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let install = CommandLine::parse("install", "false").unwrap();

        let err = ensure_dependencies(dir.path(), &install).await.unwrap_err();
        assert!(matches!(err, BootstrapError::InstallFailed { code: Some(1), .. }));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let install = CommandLine::parse("install", "eduagi-no-such-installer").unwrap();

        let err = ensure_dependencies(dir.path(), &install).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Spawn { .. }));
    }
}
