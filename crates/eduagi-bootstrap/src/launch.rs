//! Dev server process supervision

use crate::command::CommandLine;
use crate::error::{BootstrapError, Result};
use std::path::Path;
use std::process::ExitStatus;
use tokio::process::Child;
use tracing::info;

/// Run `dev` in `project_dir` until it exits and return the code to exit with
///
/// Interrupt and terminate signals received meanwhile are passed on to the
/// child, which decides when to stop.
///
/// # Errors
///
/// Returns an error if the dev server cannot be started or waited on.
pub async fn run_dev_server(project_dir: &Path, dev: &CommandLine) -> Result<i32> {
    info!("Starting dev server with '{}'", dev);
    let mut child = dev
        .command(project_dir)
        .spawn()
        .map_err(|source| BootstrapError::Spawn {
            command: dev.to_string(),
            source,
        })?;

    let status = supervise(&mut child)
        .await
        .map_err(|e| BootstrapError::io(project_dir, e))?;

    let code = exit_code(status);
    info!("Dev server stopped, exit code {}", code);
    Ok(code)
}

#[cfg(unix)]
async fn supervise(child: &mut Child) -> std::io::Result<ExitStatus> {
    use nix::sys::signal::Signal;
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    loop {
        tokio::select! {
            status = child.wait() => return status,
            _ = interrupt.recv() => forward(child, Signal::SIGINT),
            _ = terminate.recv() => forward(child, Signal::SIGTERM),
        }
    }
}

#[cfg(unix)]
fn forward(child: &Child, signal: nix::sys::signal::Signal) {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    use tracing::warn;

    // No id once the child has been reaped
    let Some(pid) = child.id().and_then(|id| i32::try_from(id).ok()) else {
        return;
    };

    info!("Stopping dev server ({})", signal);
    if let Err(e) = kill(Pid::from_raw(pid), signal) {
        warn!("Failed to forward {} to pid {}: {}", signal, pid, e);
    }
}

#[cfg(not(unix))]
async fn supervise(child: &mut Child) -> std::io::Result<ExitStatus> {
    tokio::select! {
        status = child.wait() => return status,
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Stopping dev server");
            child.start_kill()?;
        }
    }
    child.wait().await
}

/// Exit code mirroring a child's status; a signal death maps to 128 + signal
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(1)
}

#[cfg(all(test, unix))]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
        // Killed by SIGTERM (15)
        assert_eq!(exit_code(ExitStatus::from_raw(15)), 143);
    }

    #[tokio::test]
    async fn test_mirrors_child_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dev.sh"), "exit 7\n").unwrap();
        let dev = CommandLine::parse("dev", "sh dev.sh").unwrap();

        assert_eq!(run_dev_server(dir.path(), &dev).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_signal_death_maps_to_128_plus_signal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dev.sh"), "kill -TERM $$\n").unwrap();
        let dev = CommandLine::parse("dev", "sh dev.sh").unwrap();

        assert_eq!(run_dev_server(dir.path(), &dev).await.unwrap(), 143);
    }

    #[tokio::test]
    async fn test_success_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let dev = CommandLine::parse("dev", "true").unwrap();

        assert_eq!(run_dev_server(dir.path(), &dev).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failure_code_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let dev = CommandLine::parse("dev", "false").unwrap();

        assert_eq!(run_dev_server(dir.path(), &dev).await.unwrap(), 1);
    }
}
