//! HTTP client for communicating with the `EduAGI` API

use async_trait::async_trait;
use eduagi_core::config::ApiConfig;
use eduagi_core::types::{LoginRequest, TokenResponse, VideoAnalysisRequest};
use eduagi_core::{
    CurrentUser, DashboardSummary, Error, ResourceRecord, Result, SessionContext,
    TeacherDashboard, VideoAnalysisRecord,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Backend paths, relative to the configured origin
pub mod paths {
    /// Admin dashboard summary
    pub const DASHBOARD: &str = "/api/analytics/dashboard";
    /// Teacher dashboard summary
    pub const TEACHER_DASHBOARD: &str = "/api/analytics/teacher-dashboard";
    /// Resources owned by the signed-in teacher
    pub const MY_RESOURCES: &str = "/api/resources/my";
    /// Video-analysis history
    pub const VIDEO_HISTORY: &str = "/api/videos/history";
    /// Queue a video analysis
    pub const VIDEO_ANALYZE: &str = "/api/videos/analyze";
    /// Exchange credentials for a token
    pub const LOGIN: &str = "/api/auth/login";
    /// Profile of the token's owner
    pub const ME: &str = "/api/auth/me";
    /// Invalidate the token server-side
    pub const LOGOUT: &str = "/api/auth/logout";
}

/// Operations the dashboard views fetch through
///
/// Views depend on this trait rather than on [`ApiClient`] so that any
/// transport can stand behind them.
#[async_trait]
pub trait EduApi: Send + Sync {
    /// get-dashboard-summary
    async fn dashboard_summary(&self) -> Result<DashboardSummary>;

    /// get-teacher-dashboard
    async fn teacher_dashboard(&self) -> Result<TeacherDashboard>;

    /// list-own-resources
    async fn my_resources(&self) -> Result<Vec<ResourceRecord>>;

    /// list-video-analyses
    async fn video_analyses(&self) -> Result<Vec<VideoAnalysisRecord>>;

    /// submit-video-analysis
    async fn submit_video_analysis(&self, video_url: &str) -> Result<VideoAnalysisRecord>;
}

/// API client for making HTTP requests to the `EduAGI` backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    /// Create a new API client bound to a session
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: SessionContext) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Session this client authenticates with
    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Sign in and start a session
    ///
    /// # Errors
    ///
    /// Returns an error if either the credential exchange or the profile fetch fails.
    pub async fn login(&self, account_id: &str, password: &str) -> Result<CurrentUser> {
        let body = LoginRequest {
            account_id: account_id.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.url(paths::LOGIN))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::network(format!("Failed to sign in: {e}")))?;
        let token: TokenResponse = self.decode(response, "login").await?;

        let response = self
            .client
            .get(self.url(paths::ME))
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| Error::network(format!("Failed to fetch profile: {e}")))?;
        let user: CurrentUser = self.decode(response, "profile").await?;

        self.session.login(user.clone(), token.access_token);
        Ok(user)
    }

    /// End the session locally and tell the backend
    ///
    /// The local session is cleared even when the backend call fails.
    pub async fn logout(&self) {
        if self.session.is_authenticated() {
            let request = self.authorize(self.client.post(self.url(paths::LOGOUT)));
            if let Err(e) = request.send().await {
                warn!("Backend logout failed: {}", e);
            }
        }
        self.session.logout();
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        debug!(path, "GET");
        let response = self
            .authorize(self.client.get(self.url(path)))
            .send()
            .await
            .map_err(|e| Error::network(format!("Failed to fetch {what}: {e}")))?;

        self.decode(response, what).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, what: &str) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let response = self
            .authorize(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::network(format!("Failed to submit {what}: {e}")))?;

        self.decode(response, what).await
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response, what: &str) -> Result<T> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("API rejected the session token while fetching {}", what);
            self.session.logout();
            return Err(Error::Unauthorized);
        }

        if !status.is_success() {
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body.get("detail").and_then(serde_json::Value::as_str).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            return Err(Error::api(status.as_u16(), detail));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::decode(format!("Failed to parse {what}: {e}")))
    }
}

#[async_trait]
impl EduApi for ApiClient {
    async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        self.get_json(paths::DASHBOARD, "dashboard summary").await
    }

    async fn teacher_dashboard(&self) -> Result<TeacherDashboard> {
        self.get_json(paths::TEACHER_DASHBOARD, "teacher dashboard")
            .await
    }

    async fn my_resources(&self) -> Result<Vec<ResourceRecord>> {
        self.get_json(paths::MY_RESOURCES, "resources").await
    }

    async fn video_analyses(&self) -> Result<Vec<VideoAnalysisRecord>> {
        self.get_json(paths::VIDEO_HISTORY, "analysis history").await
    }

    async fn submit_video_analysis(&self, video_url: &str) -> Result<VideoAnalysisRecord> {
        let body = VideoAnalysisRequest {
            video_url: video_url.to_string(),
        };
        self.post_json(paths::VIDEO_ANALYZE, &body, "video analysis")
            .await
    }
}
