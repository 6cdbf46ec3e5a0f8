//! In-memory [`EduApi`] for unit tests

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use crate::api_client::EduApi;
use async_trait::async_trait;
use eduagi_core::{
    AnalysisStatus, DashboardSummary, Error, ResourceRecord, Result, TeacherDashboard, Timestamp,
    VideoAnalysisRecord,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned reply; `Err` carries the message of a network failure
pub type Reply<T> = std::result::Result<T, String>;

fn answer<T: Clone>(reply: &Reply<T>) -> Result<T> {
    reply.clone().map_err(Error::network)
}

#[derive(Debug)]
pub struct StubApi {
    pub summary: Reply<DashboardSummary>,
    pub teacher: Reply<TeacherDashboard>,
    pub resources: Reply<Vec<ResourceRecord>>,
    pub history: Reply<Vec<VideoAnalysisRecord>>,
    pub submit: Reply<VideoAnalysisRecord>,
    pub history_calls: AtomicUsize,
    pub submitted: Mutex<Vec<String>>,
}

impl Default for StubApi {
    fn default() -> Self {
        Self {
            summary: Ok(DashboardSummary::default()),
            teacher: Ok(TeacherDashboard::default()),
            resources: Ok(Vec::new()),
            history: Ok(Vec::new()),
            submit: Ok(analysis(1, "http://x/y.mp4", AnalysisStatus::Pending)),
            history_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

impl StubApi {
    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl EduApi for StubApi {
    async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        answer(&self.summary)
    }

    async fn teacher_dashboard(&self) -> Result<TeacherDashboard> {
        answer(&self.teacher)
    }

    async fn my_resources(&self) -> Result<Vec<ResourceRecord>> {
        answer(&self.resources)
    }

    async fn video_analyses(&self) -> Result<Vec<VideoAnalysisRecord>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        answer(&self.history)
    }

    async fn submit_video_analysis(&self, video_url: &str) -> Result<VideoAnalysisRecord> {
        self.submitted.lock().push(video_url.to_string());
        answer(&self.submit)
    }
}

pub fn timestamp(value: &str) -> Timestamp {
    Timestamp::parse(value).expect("valid timestamp")
}

pub fn resource(id: i64, title: &str, description: Option<&str>, file_type: &str) -> ResourceRecord {
    ResourceRecord {
        id,
        title: title.to_string(),
        description: description.map(str::to_string),
        file_type: file_type.to_string(),
        created_at: timestamp("2024-03-01T08:15:00Z"),
    }
}

pub fn analysis(id: i64, url: &str, status: AnalysisStatus) -> VideoAnalysisRecord {
    VideoAnalysisRecord {
        id,
        video_url: url.to_string(),
        status,
        analyzed_at: timestamp("2024-03-02T10:00:00Z"),
        analysis_result: None,
    }
}
