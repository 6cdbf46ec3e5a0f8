//! Video analysis: history table plus the "analyze this URL" form

use super::{Cell, Column, TableModel};
use crate::api_client::EduApi;
use crate::loader::{FailurePolicy, LoadOutcome, LoadState, Loader};
use crate::notify::Notifier;
use eduagi_core::config::UiConfig;
use eduagi_core::{AnalysisStatus, Error, VideoAnalysisRecord};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const HISTORY_COLUMNS: &[Column] = &[
    Column::new("id", "ID", Some(80)),
    Column::new("video_url", "Video URL", None),
    Column::new("status", "Status", Some(100)),
    Column::new("analyzed_at", "Analyzed at", Some(180)),
];

/// Notification shown when the history cannot be fetched
pub const HISTORY_FAILED: &str = "Failed to load analysis history";
/// Notification shown for a blank URL
pub const URL_REQUIRED: &str = "Please enter a video URL";
/// Notification shown once the backend accepted the job
pub const ANALYSIS_STARTED: &str = "Video analysis started";
/// Notification shown when the backend refused the job
pub const ANALYSIS_FAILED: &str = "Video analysis failed";

/// Result of [`VideoAnalysisView::submit`]
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The input was blank; no request was made
    Rejected,
    /// A submission is already running; no request was made
    Busy,
    /// The backend refused the job; the input is kept
    Failed(Error),
    /// The job was queued; `refresh` resolves once the delayed history reload ran
    Queued {
        /// Record the backend created
        record: VideoAnalysisRecord,
        /// Delayed history reload
        refresh: JoinHandle<LoadOutcome>,
    },
}

/// Tag for an analysis status
#[must_use]
pub fn status_tag(status: &AnalysisStatus) -> Cell {
    match status {
        AnalysisStatus::Completed => Cell::tag("Completed", "green"),
        AnalysisStatus::Processing => Cell::tag("Processing", "blue"),
        AnalysisStatus::Pending => Cell::tag("Pending", "orange"),
        AnalysisStatus::Failed => Cell::tag("Failed", "red"),
        AnalysisStatus::Other(raw) => Cell::tag(raw.clone(), "red"),
    }
}

/// Video analysis page
pub struct VideoAnalysisView {
    api: Arc<dyn EduApi>,
    notifier: Arc<dyn Notifier>,
    history: Loader<Vec<VideoAnalysisRecord>>,
    input: Mutex<String>,
    submitting: AtomicBool,
    refresh_delay: Duration,
}

impl std::fmt::Debug for VideoAnalysisView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoAnalysisView")
            .field("history", &self.history)
            .field("input", &*self.input.lock())
            .field("submitting", &self.is_submitting())
            .field("refresh_delay", &self.refresh_delay)
            .finish_non_exhaustive()
    }
}

impl VideoAnalysisView {
    /// Create an empty view that reloads the history `refresh_delay` after a submission
    #[must_use]
    pub fn new(api: Arc<dyn EduApi>, notifier: Arc<dyn Notifier>, refresh_delay: Duration) -> Self {
        Self {
            history: Loader::new(
                "video-history",
                LoadState::new(),
                FailurePolicy::Notify(HISTORY_FAILED.to_string()),
                Arc::clone(&notifier),
            ),
            api,
            notifier,
            input: Mutex::new(String::new()),
            submitting: AtomicBool::new(false),
            refresh_delay,
        }
    }

    /// Create an empty view using the configured refresh delay
    #[must_use]
    pub fn from_config(ui: &UiConfig, api: Arc<dyn EduApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(api, notifier, ui.refresh_delay())
    }

    /// Wait between a queued submission and the history reload
    #[must_use]
    pub const fn refresh_delay(&self) -> Duration {
        self.refresh_delay
    }

    /// Activate the view and fetch the history once
    pub async fn mount(&self) -> LoadOutcome {
        self.history.mount();
        self.refresh().await
    }

    /// Deactivate the view; a pending delayed reload becomes a no-op
    pub fn unmount(&self) {
        self.history.unmount();
    }

    /// Fetch the history again
    pub async fn refresh(&self) -> LoadOutcome {
        reload(&self.history, Arc::clone(&self.api)).await
    }

    /// Current history state
    #[must_use]
    pub fn state(&self) -> LoadState<Vec<VideoAnalysisRecord>> {
        self.history.snapshot()
    }

    /// Subscribe to history transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<Vec<VideoAnalysisRecord>>> {
        self.history.subscribe()
    }

    /// Current contents of the URL field
    #[must_use]
    pub fn input(&self) -> String {
        self.input.lock().clone()
    }

    /// Replace the contents of the URL field
    pub fn set_input(&self, value: impl Into<String>) {
        *self.input.lock() = value.into();
    }

    /// Whether a submission is in flight
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Submit the URL in the input field for analysis
    ///
    /// Must be called within a tokio runtime; on success the delayed history
    /// reload is spawned onto it.
    pub async fn submit(&self) -> SubmitOutcome {
        let url = self.input.lock().trim().to_string();
        if url.is_empty() {
            self.notifier.error(URL_REQUIRED);
            return SubmitOutcome::Rejected;
        }

        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("submission ignored: another one is in flight");
            return SubmitOutcome::Busy;
        }

        let result = self.api.submit_video_analysis(&url).await;
        self.submitting.store(false, Ordering::Release);

        match result {
            Ok(record) => {
                info!(id = record.id, video_url = %record.video_url, "video analysis queued");
                self.notifier.success(ANALYSIS_STARTED);
                self.input.lock().clear();
                let refresh = self.schedule_refresh();
                SubmitOutcome::Queued { record, refresh }
            }
            Err(e) => {
                warn!(error = %e, "video analysis submission failed");
                self.notifier.error(ANALYSIS_FAILED);
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// History table
    #[must_use]
    pub fn table(&self) -> TableModel {
        let state = self.history.snapshot();
        let records = state.visible().map_or(&[][..], Vec::as_slice);

        TableModel {
            columns: HISTORY_COLUMNS,
            rows: records.iter().map(row).collect(),
            loading: state.is_busy(),
            empty_text: "No analyses yet",
            total_label: Some(format!("{} records", records.len())),
        }
    }

    fn schedule_refresh(&self) -> JoinHandle<LoadOutcome> {
        let history = self.history.clone();
        let api = Arc::clone(&self.api);
        let delay = self.refresh_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            reload(&history, api).await
        })
    }
}

async fn reload(history: &Loader<Vec<VideoAnalysisRecord>>, api: Arc<dyn EduApi>) -> LoadOutcome {
    history.load(|| async move { api.video_analyses().await }).await
}

fn row(record: &VideoAnalysisRecord) -> Vec<Cell> {
    vec![
        Cell::text(record.id.to_string()),
        Cell::text(record.video_url.clone()),
        status_tag(&record.status),
        Cell::text(record.analyzed_at.display()),
    ]
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::notify::{Notification, NotificationQueue};
    use crate::test_support::{StubApi, analysis};
    use pretty_assertions::assert_eq;

    fn view_with(api: StubApi, queue: &NotificationQueue) -> (Arc<StubApi>, VideoAnalysisView) {
        let api = Arc::new(api);
        let view = VideoAnalysisView::new(
            Arc::clone(&api) as Arc<dyn EduApi>,
            Arc::new(queue.clone()),
            Duration::from_millis(20),
        );
        (api, view)
    }

    #[test]
    fn test_status_tags() {
        assert_eq!(status_tag(&AnalysisStatus::Completed), Cell::tag("Completed", "green"));
        assert_eq!(status_tag(&AnalysisStatus::Processing), Cell::tag("Processing", "blue"));
        assert_eq!(status_tag(&AnalysisStatus::Failed), Cell::tag("Failed", "red"));
        assert_eq!(
            status_tag(&AnalysisStatus::Other("archived".to_string())),
            Cell::tag("archived", "red")
        );
    }

    #[test]
    fn test_refresh_delay_from_config() {
        let api: Arc<dyn EduApi> = Arc::new(StubApi::default());
        let queue: Arc<dyn Notifier> = Arc::new(NotificationQueue::new());

        let view = VideoAnalysisView::from_config(&UiConfig::default(), Arc::clone(&api), Arc::clone(&queue));
        assert_eq!(view.refresh_delay(), Duration::from_millis(2000));

        let ui = UiConfig {
            refresh_delay_ms: 250,
        };
        let view = VideoAnalysisView::from_config(&ui, api, queue);
        assert_eq!(view.refresh_delay(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_blank_url_never_submits() {
        let queue = NotificationQueue::new();
        let (api, view) = view_with(StubApi::default(), &queue);

        for blank in ["", "   ", "\t\n"] {
            view.set_input(blank);
            assert!(matches!(view.submit().await, SubmitOutcome::Rejected));
        }

        assert!(api.submitted().is_empty());
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.last(), Some(Notification::error(URL_REQUIRED)));
    }

    #[tokio::test]
    async fn test_success_clears_input_and_reloads() {
        let queue = NotificationQueue::new();
        let (api, view) = view_with(
            StubApi {
                history: Ok(vec![analysis(9, "http://x/y.mp4", AnalysisStatus::Pending)]),
                ..StubApi::default()
            },
            &queue,
        );
        view.set_input("  http://x/y.mp4 ");

        let SubmitOutcome::Queued { record, refresh } = view.submit().await else {
            panic!("submission should be queued");
        };

        assert_eq!(record.video_url, "http://x/y.mp4");
        assert_eq!(api.submitted(), vec!["http://x/y.mp4".to_string()]);
        assert_eq!(view.input(), "");
        assert!(!view.is_submitting());
        assert_eq!(queue.drain(), vec![Notification::success(ANALYSIS_STARTED)]);

        assert_eq!(refresh.await.unwrap(), LoadOutcome::Applied);
        assert_eq!(api.history_calls(), 1);
        assert_eq!(view.table().rows.len(), 1);
        assert_eq!(view.table().rows[0][2], Cell::tag("Pending", "orange"));
    }

    #[tokio::test]
    async fn test_failure_keeps_input() {
        let queue = NotificationQueue::new();
        let (api, view) = view_with(
            StubApi {
                submit: Err("bad gateway".to_string()),
                ..StubApi::default()
            },
            &queue,
        );
        view.set_input("http://x/y.mp4");

        assert!(matches!(view.submit().await, SubmitOutcome::Failed(_)));
        assert_eq!(view.input(), "http://x/y.mp4");
        assert!(!view.is_submitting());
        assert_eq!(queue.drain(), vec![Notification::error(ANALYSIS_FAILED)]);
        assert_eq!(api.history_calls(), 0);
    }

    #[tokio::test]
    async fn test_unmount_cancels_delayed_reload_effect() {
        let queue = NotificationQueue::new();
        let (api, view) = view_with(StubApi::default(), &queue);
        view.set_input("http://x/y.mp4");

        let SubmitOutcome::Queued { refresh, .. } = view.submit().await else {
            panic!("submission should be queued");
        };
        view.unmount();

        assert_eq!(refresh.await.unwrap(), LoadOutcome::Detached);
        assert_eq!(api.history_calls(), 0);
    }
}
