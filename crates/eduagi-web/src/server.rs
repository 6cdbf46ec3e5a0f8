//! Development server setup

use crate::{routes::build_routes, state::AppState};
use axum::Router;
use eduagi_core::{Result, config::DevServerConfig};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the complete dev server application
///
/// # Errors
///
/// Returns an error if the upstream client cannot be built.
pub fn build_app(config: DevServerConfig) -> Result<Router> {
    let state = Arc::new(AppState::new(config)?);

    Ok(build_routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http()))
}
