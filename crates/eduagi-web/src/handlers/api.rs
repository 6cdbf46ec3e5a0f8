//! Reverse proxy to the backend API

use crate::state::AppState;
use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderMap, HeaderName, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use eduagi_core::config::ProxyRule;
use tracing::{debug, error};

/// Largest request body forwarded upstream
pub const MAX_PROXY_BODY: usize = 32 * 1024 * 1024;

fn is_forwardable(name: &HeaderName) -> bool {
    !matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
            | "host"
            | "content-length"
    )
}

fn forwardable(headers: &HeaderMap) -> impl Iterator<Item = (&HeaderName, &header::HeaderValue)> {
    headers.iter().filter(|(name, _)| is_forwardable(name))
}

/// Forward `request` to the rule's target, keeping method, path, query, body and end-to-end headers
pub async fn proxy(state: &AppState, rule: &ProxyRule, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let url = rule.upstream_url(parts.uri.path(), parts.uri.query());
    debug!(method = %parts.method, %url, "proxying");

    let body = match to_bytes(body, MAX_PROXY_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to read request body for {}: {}", url, e);
            return proxy_error(StatusCode::PAYLOAD_TOO_LARGE, "Request body rejected", &e);
        }
    };

    let mut upstream = state.upstream.request(parts.method.clone(), &url).body(body);
    for (name, value) in forwardable(&parts.headers) {
        upstream = upstream.header(name, value);
    }

    match upstream.send().await {
        Ok(reply) => {
            let status = reply.status();
            let headers = reply.headers().clone();

            let mut response = Response::new(Body::from_stream(reply.bytes_stream()));
            *response.status_mut() = status;
            for (name, value) in forwardable(&headers) {
                response.headers_mut().append(name, value.clone());
            }
            response
        }
        Err(e) => {
            error!("Failed to reach upstream {}: {}", url, e);
            proxy_error(StatusCode::BAD_GATEWAY, "Upstream request failed", &e)
        }
    }
}

fn proxy_error(status: StatusCode, message: &str, cause: &dyn std::fmt::Display) -> Response {
    (
        status,
        Json(serde_json::json!({
            "error": message,
            "message": cause.to_string(),
        })),
    )
        .into_response()
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_hop_by_hop_headers_are_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3001"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut kept: Vec<&str> = forwardable(&headers).map(|(name, _)| name.as_str()).collect();
        kept.sort_unstable();
        assert_eq!(kept, vec!["authorization", "content-type"]);
    }
}
