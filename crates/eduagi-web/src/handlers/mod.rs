//! HTTP handlers for the development server

pub mod api;
pub mod assets;

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    response::Response,
};
use std::sync::Arc;

/// Route a request that matched no explicit route
///
/// Paths under a proxy prefix go upstream; everything else is a static asset.
pub async fn dispatch(State(state): State<Arc<AppState>>, request: Request) -> Response {
    if let Some(rule) = state.config.find_rule(request.uri().path()).cloned() {
        return api::proxy(&state, &rule, request).await;
    }
    assets::serve(&state, request).await
}
