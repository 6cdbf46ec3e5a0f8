//! Integration tests for the development server

#![allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use eduagi_core::config::{DevServerConfig, ProxyRule};
use eduagi_web::build_app;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header as header_is, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<div id=\"root\"></div>").unwrap();
    fs::create_dir(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets/app.js"), "console.log('app')").unwrap();
    dir
}

fn dev_config(site: &TempDir, target: &str) -> DevServerConfig {
    DevServerConfig {
        static_dir: site.path().to_path_buf(),
        proxy: vec![ProxyRule {
            prefix: "/api".to_string(),
            target: target.to_string(),
        }],
        ..DevServerConfig::default()
    }
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let site = site();
    let app = build_app(dev_config(&site, "http://127.0.0.1:9")).unwrap();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn test_proxy_forwards_method_path_query_and_body() {
    common::init_test_logging();
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/videos/analyze"))
        .and(query_param("source", "dashboard"))
        .and(header_is("authorization", "Bearer tok"))
        .and(body_json(json!({"video_url": "http://x/y.mp4"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": 4}))
                .insert_header("x-request-id", "abc"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let site = site();
    let app = build_app(dev_config(&site, &upstream.uri())).unwrap();

    let request = Request::post("/api/videos/analyze?source=dashboard")
        .header(header::AUTHORIZATION, "Bearer tok")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"video_url": "http://x/y.mp4"}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()["x-request-id"], "abc");
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body, json!({"id": 4}));
}

#[tokio::test]
async fn test_proxy_passes_upstream_errors_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&upstream)
        .await;

    let site = site();
    let app = build_app(dev_config(&site, &upstream.uri())).unwrap();

    let response = app
        .oneshot(Request::get("/api/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let upstream = MockServer::start().await;
    let target = upstream.uri();
    drop(upstream);

    let site = site();
    let app = build_app(dev_config(&site, &target)).unwrap();

    let response = app
        .oneshot(Request::get("/api/videos/history").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "Upstream request failed");
}

#[tokio::test]
async fn test_static_files_and_spa_fallback() {
    let site = site();
    let app = build_app(dev_config(&site, "http://127.0.0.1:9")).unwrap();

    let asset = app
        .clone()
        .oneshot(Request::get("/assets/app.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(asset.status(), StatusCode::OK);
    assert_eq!(body_text(asset).await, "console.log('app')");

    let route = app
        .oneshot(Request::get("/teacher/videos").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(route.status(), StatusCode::OK);
    assert_eq!(body_text(route).await, "<div id=\"root\"></div>");
}

#[tokio::test]
async fn test_prefix_matches_on_segment_boundary() {
    let site = site();
    let app = build_app(dev_config(&site, "http://127.0.0.1:9")).unwrap();

    // "/apiary" is not under "/api", so it is served as an app route
    let response = app
        .oneshot(Request::get("/apiary").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<div id=\"root\"></div>");
}
