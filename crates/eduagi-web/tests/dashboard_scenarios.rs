//! End-to-end view scenarios against a mock backend

#![allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{analysis_json, client_for, init_test_logging, teacher_session};
use eduagi_web::views::videos::{ANALYSIS_STARTED, URL_REQUIRED};
use eduagi_web::views::{AdminDashboardView, ResourcesView, SubmitOutcome, VideoAnalysisView};
use eduagi_web::{EduApi, LoadOutcome, Notification, NotificationQueue, Phase};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Dashboard with 5 users, 2 resources and no activity
#[tokio::test]
async fn test_dashboard_summary_scenario() {
    init_test_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_users": 5,
            "total_resources": 2,
            "total_exams": 0,
            "recent_activities": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api: Arc<dyn EduApi> = Arc::new(client_for(&server, &teacher_session("tok")));
    let view = AdminDashboardView::new(api, Arc::new(NotificationQueue::new()));

    assert_eq!(view.mount().await, LoadOutcome::Applied);

    let values: Vec<u64> = view.stat_cards().iter().map(|c| c.value).collect();
    assert_eq!(values, vec![5, 2, 0, 0]);

    let table = view.activity_table();
    assert!(table.is_empty());
    assert_eq!(table.empty_text, "No recent activity");
}

/// Dashboard failures keep the zeroed counters and stay silent
#[tokio::test]
async fn test_dashboard_failure_keeps_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let queue = NotificationQueue::new();
    let api: Arc<dyn EduApi> = Arc::new(client_for(&server, &teacher_session("tok")));
    let view = AdminDashboardView::new(api, Arc::new(queue.clone()));

    assert_eq!(view.mount().await, LoadOutcome::Failed);
    let values: Vec<u64> = view.stat_cards().iter().map(|c| c.value).collect();
    assert_eq!(values, vec![0, 0, 0, 0]);
    assert!(queue.is_empty());
}

/// A failed reload keeps the previous rows retained and notifies once
#[tokio::test]
async fn test_resources_failure_after_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/resources/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Loops", "file_type": "pdf", "created_at": "2024-02-20T12:00:00Z"}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/resources/my"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let queue = NotificationQueue::new();
    let api: Arc<dyn EduApi> = Arc::new(client_for(&server, &teacher_session("tok")));
    let view = ResourcesView::new(api, Arc::new(queue.clone()));

    assert_eq!(view.mount().await, LoadOutcome::Applied);
    assert_eq!(view.table().rows.len(), 1);

    assert_eq!(view.refresh().await, LoadOutcome::Failed);
    let state = view.state();
    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(state.data().map(Vec::len), Some(1));
    assert!(!state.is_busy());
    assert_eq!(queue.drain().len(), 1);
}

/// Submitting a URL queues the job, clears the input and reloads the history
#[tokio::test]
async fn test_video_analyze_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/videos/analyze"))
        .and(body_json(json!({"video_url": "http://x/y.mp4"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(analysis_json(21, "http://x/y.mp4", "pending")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/videos/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            analysis_json(21, "http://x/y.mp4", "pending"),
            analysis_json(20, "http://x/old.mp4", "completed")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let queue = NotificationQueue::new();
    let api: Arc<dyn EduApi> = Arc::new(client_for(&server, &teacher_session("tok")));
    let view = VideoAnalysisView::new(api, Arc::new(queue.clone()), Duration::from_millis(50));

    view.set_input("http://x/y.mp4");
    let SubmitOutcome::Queued { record, refresh } = view.submit().await else {
        panic!("submission should be queued");
    };

    assert_eq!(record.id, 21);
    assert_eq!(view.input(), "");
    assert_eq!(queue.drain(), vec![Notification::success(ANALYSIS_STARTED)]);

    // Nothing is fetched before the delay elapses
    let before = server.received_requests().await.unwrap();
    assert!(before.iter().all(|r| r.url.path() != "/api/videos/history"));

    assert_eq!(refresh.await.unwrap(), LoadOutcome::Applied);
    let table = view.table();
    let ids: Vec<&str> = table.rows.iter().map(|row| row[0].as_text()).collect();
    assert_eq!(ids, vec!["21", "20"]);
}

/// Blank input never reaches the backend
#[tokio::test]
async fn test_blank_url_is_never_posted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/videos/analyze"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let queue = NotificationQueue::new();
    let api: Arc<dyn EduApi> = Arc::new(client_for(&server, &teacher_session("tok")));
    let view = VideoAnalysisView::new(api, Arc::new(queue.clone()), Duration::from_millis(50));

    view.set_input("   ");
    assert!(matches!(view.submit().await, SubmitOutcome::Rejected));
    assert_eq!(queue.drain(), vec![Notification::error(URL_REQUIRED)]);
    assert!(server.received_requests().await.unwrap().is_empty());
}
