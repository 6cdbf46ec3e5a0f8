//! Error types for the bootstrap launcher

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, BootstrapError>;

/// Errors that stop the launcher before or while running the dev server
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Reading or writing the project directory failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The project manifest could not be encoded
    #[error("Failed to encode package.json: {0}")]
    Manifest(#[from] serde_json::Error),

    /// A command line was empty
    #[error("Empty {what} command")]
    EmptyCommand {
        /// Which command
        what: &'static str,
    },

    /// A child process could not be started
    #[error("Failed to start '{command}': {source}")]
    Spawn {
        /// Command line
        command: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Dependency installation exited unsuccessfully
    #[error("Dependency installation failed ('{command}' exited with {})", describe(.code))]
    InstallFailed {
        /// Command line
        command: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
    },
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn describe(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
}

impl BootstrapError {
    /// Create an I/O error for `path`
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = BootstrapError::InstallFailed {
            command: "npm install".to_string(),
            code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "Dependency installation failed ('npm install' exited with code 2)"
        );

        let err = BootstrapError::InstallFailed {
            command: "npm install".to_string(),
            code: None,
        };
        assert!(err.to_string().ends_with("exited with a signal)"));
    }
}
