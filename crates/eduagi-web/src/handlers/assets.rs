//! Static assets with the single-page-app fallback

use crate::state::AppState;
use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;

/// Serve a file from the static directory, or `index.html` when none matches
pub async fn serve(state: &AppState, request: Request) -> Response {
    match state.static_files.clone().oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
