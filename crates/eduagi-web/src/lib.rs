//! `EduAGI` dashboard client
//!
//! View models for the admin and teacher dashboards, the API client they fetch
//! through, and a development server that proxies API calls and serves the
//! built frontend.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod app;
pub mod guard;
pub mod handlers;
pub mod loader;
pub mod notify;
pub mod routes;
pub mod server;
pub mod shell;
pub mod state;
pub mod views;

#[cfg(test)]
mod test_support;

// Re-export the main types
pub use api_client::{ApiClient, EduApi};
pub use app::App;
pub use guard::{LOGIN_ROUTE, RouteDecision, resolve};
pub use loader::{FailurePolicy, LoadOutcome, LoadState, Loader, Phase};
pub use notify::{Notification, NotificationLevel, NotificationQueue, Notifier, TracingNotifier};
pub use server::build_app;
pub use shell::{MenuEntry, NavigationShell};
pub use state::AppState;
