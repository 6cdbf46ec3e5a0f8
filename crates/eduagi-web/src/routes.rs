//! Route definitions for the development server

use crate::{handlers, state::AppState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Build the dev server router
///
/// Only `/health` is an explicit route. Proxying and static files share the
/// fallback so that a proxy prefix may be any path.
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::api::health_check))
        .fallback(handlers::dispatch)
}
