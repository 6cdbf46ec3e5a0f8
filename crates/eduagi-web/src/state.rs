//! Dev server state

use eduagi_core::config::DevServerConfig;
use eduagi_core::{Error, Result};
use reqwest::{Client, redirect};
use tower_http::services::{ServeDir, ServeFile};

/// Shared state of the development server
#[derive(Debug, Clone)]
pub struct AppState {
    /// Server configuration, including the proxy rules
    pub config: DevServerConfig,
    /// Client used for upstream requests; redirects are passed through to the browser
    pub upstream: Client,
    /// Static file service with the SPA fallback to `index.html`
    pub static_files: ServeDir<ServeFile>,
}

impl AppState {
    /// Create new dev server state
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream HTTP client cannot be built.
    pub fn new(config: DevServerConfig) -> Result<Self> {
        let upstream = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build proxy client: {e}")))?;

        let index = config.static_dir.join("index.html");
        let static_files = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

        Ok(Self {
            config,
            upstream,
            static_files,
        })
    }
}
