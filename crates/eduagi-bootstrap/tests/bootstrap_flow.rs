//! End-to-end tests for the bootstrap sequence

#![cfg(unix)]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use eduagi_bootstrap::manifest::MANIFEST_FILE;
use eduagi_bootstrap::{BootstrapError, BootstrapPlan, CommandLine, run};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn plan(install: &str, dev: &str) -> BootstrapPlan {
    BootstrapPlan {
        install: CommandLine::parse("install", install).unwrap(),
        dev: CommandLine::parse("dev", dev).unwrap(),
        skip_manifest: false,
        skip_install: false,
    }
}

fn script(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

#[tokio::test]
async fn test_fresh_checkout_is_prepared_and_launched() {
    let dir = tempfile::tempdir().unwrap();
    script(dir.path(), "install.sh", "mkdir node_modules\n");
    script(dir.path(), "dev.sh", "test -d node_modules && exit 0\nexit 9\n");

    let code = run(dir.path(), &plan("sh install.sh", "sh dev.sh")).await.unwrap();

    assert_eq!(code, 0);
    assert!(dir.path().join(MANIFEST_FILE).is_file());
    assert!(dir.path().join("node_modules").is_dir());
}

#[tokio::test]
async fn test_install_failure_stops_before_dev_server() {
    let dir = tempfile::tempdir().unwrap();
    script(dir.path(), "dev.sh", "touch started\n");

    let err = run(dir.path(), &plan("false", "sh dev.sh")).await.unwrap_err();

    assert!(matches!(err, BootstrapError::InstallFailed { .. }));
    assert!(!dir.path().join("started").exists());
}

#[tokio::test]
async fn test_dev_exit_code_is_mirrored() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("node_modules")).unwrap();
    script(dir.path(), "dev.sh", "exit 42\n");

    let code = run(dir.path(), &plan("false", "sh dev.sh")).await.unwrap();
    assert_eq!(code, 42);
}

#[tokio::test]
async fn test_skip_flags() {
    let dir = tempfile::tempdir().unwrap();
    let plan = BootstrapPlan {
        skip_manifest: true,
        skip_install: true,
        ..plan("false", "true")
    };

    assert_eq!(run(dir.path(), &plan).await.unwrap(), 0);
    assert!(!dir.path().join(MANIFEST_FILE).exists());
}
