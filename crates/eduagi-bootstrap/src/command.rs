//! Child command lines

use crate::error::{BootstrapError, Result};
use std::fmt;
use std::path::Path;
use tokio::process::Command;

/// A program with its arguments, split on whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Parse a command line such as `npm run dev`
    ///
    /// # Errors
    ///
    /// Returns an error if `line` holds no program.
    pub fn parse(what: &'static str, line: &str) -> Result<Self> {
        let mut words = line.split_whitespace().map(str::to_string);
        let program = words.next().ok_or(BootstrapError::EmptyCommand { what })?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    /// Program name
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Command running in `dir` with inherited stdio
    #[must_use]
    pub fn command(&self, dir: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).current_dir(dir);
        command
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
