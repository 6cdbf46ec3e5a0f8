//! Core types and utilities for the `EduAGI` dashboard client

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod config;
pub mod error;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use session::{Session, SessionContext};
pub use types::{
    ActivityRecord, AnalysisStatus, CurrentUser, DashboardSummary, ResourceRecord, Role,
    TeacherDashboard, Timestamp, VideoAnalysisRecord,
};

/// Initialize the logging system
///
/// `RUST_LOG` wins over the configured level. Calling this twice is harmless.
pub fn init_logging(config: &config::LoggingConfig) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let result = if config.format == "json" {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
