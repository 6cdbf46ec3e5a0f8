//! Shared helpers for the eduagi-web integration tests

#![allow(dead_code, clippy::missing_panics_doc, clippy::unwrap_used)]

use eduagi_core::config::{ApiConfig, LoggingConfig};
use eduagi_core::{CurrentUser, Role, SessionContext};
use eduagi_web::ApiClient;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Install a quiet subscriber once per test binary
pub fn init_test_logging() {
    eduagi_core::init_logging(&LoggingConfig {
        level: "warn".to_string(),
        format: "pretty".to_string(),
    });
}

/// Client pointed at a mock backend
pub fn client_for(server: &MockServer, session: &SessionContext) -> ApiClient {
    let config = ApiConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    ApiClient::new(&config, session.clone()).unwrap()
}

/// Signed-in teacher session
pub fn teacher_session(token: &str) -> SessionContext {
    let session = SessionContext::new();
    session.login(
        CurrentUser {
            id: 3,
            account_id: "t003".to_string(),
            display_name: "Li Wei".to_string(),
            role: Role::Teacher,
            class_id: None,
        },
        token,
    );
    session
}

/// History entry as the backend sends it
pub fn analysis_json(id: i64, url: &str, status: &str) -> Value {
    json!({
        "id": id,
        "video_url": url,
        "status": status,
        "analyzed_at": "2024-03-02T10:00:00",
        "analysis_result": null
    })
}
