//! Minimal `package.json` for the frontend project

use crate::error::{BootstrapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Name of the manifest file
pub const MANIFEST_FILE: &str = "package.json";

/// npm project manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    /// Package name
    pub name: String,
    /// Never published
    pub private: bool,
    /// Package version
    pub version: String,
    /// Module system
    #[serde(rename = "type")]
    pub module_type: String,
    /// npm scripts
    pub scripts: BTreeMap<String, String>,
    /// Runtime dependencies
    pub dependencies: BTreeMap<String, String>,
    /// Build-time dependencies
    pub dev_dependencies: BTreeMap<String, String>,
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

impl Default for ProjectManifest {
    fn default() -> Self {
        Self {
            name: "eduagi-frontend".to_string(),
            private: true,
            version: "0.0.0".to_string(),
            module_type: "module".to_string(),
            scripts: table(&[
                ("dev", "vite"),
                ("build", "tsc && vite build"),
                (
                    "lint",
                    "eslint . --ext ts,tsx --report-unused-disable-directives --max-warnings 0",
                ),
                ("preview", "vite preview"),
            ]),
            dependencies: table(&[
                ("react", "^18.2.0"),
                ("react-dom", "^18.2.0"),
                ("react-router-dom", "^6.8.1"),
                ("antd", "^5.12.8"),
                ("@ant-design/icons", "^5.2.6"),
                ("axios", "^1.6.2"),
                ("zustand", "^4.4.7"),
            ]),
            dev_dependencies: table(&[
                ("@types/react", "^18.2.43"),
                ("@types/react-dom", "^18.2.17"),
                ("@typescript-eslint/eslint-plugin", "^6.14.0"),
                ("@typescript-eslint/parser", "^6.14.0"),
                ("@vitejs/plugin-react", "^4.2.1"),
                ("eslint", "^8.55.0"),
                ("eslint-plugin-react-hooks", "^4.6.0"),
                ("eslint-plugin-react-refresh", "^0.4.5"),
                ("typescript", "^5.2.2"),
                ("vite", "^5.0.8"),
            ]),
        }
    }
}

/// Write the default manifest into `project_dir` unless one exists
///
/// Returns whether a file was written. An existing manifest is never touched.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn ensure_manifest(project_dir: &Path) -> Result<bool> {
    let path = project_dir.join(MANIFEST_FILE);
    if path.exists() {
        return Ok(false);
    }

    info!("Initializing frontend project in {}", project_dir.display());
    let mut contents = serde_json::to_string_pretty(&ProjectManifest::default())?;
    contents.push('\n');
    std::fs::write(&path, contents).map_err(|e| BootstrapError::io(&path, e))?;
    info!("Created {}", path.display());

    Ok(true)
}
