//! Admin dashboard: platform counters and recent activity

use super::{Cell, Column, StatCard, TableModel};
use crate::api_client::EduApi;
use crate::loader::{FailurePolicy, LoadOutcome, LoadState, Loader};
use crate::notify::Notifier;
use eduagi_core::DashboardSummary;
use std::sync::Arc;
use tokio::sync::watch;

const ACTIVITY_COLUMNS: &[Column] = &[
    Column::new("time", "Time", Some(150)),
    Column::new("user", "User", Some(100)),
    Column::new("activity", "Activity", None),
];

/// Empty-state text of the activity table
pub const NO_ACTIVITY: &str = "No recent activity";

/// Admin landing page
#[derive(Clone)]
pub struct AdminDashboardView {
    api: Arc<dyn EduApi>,
    summary: Loader<DashboardSummary>,
}

impl std::fmt::Debug for AdminDashboardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminDashboardView")
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl AdminDashboardView {
    /// Create the view with zeroed counters
    ///
    /// Fetch failures are logged and leave the counters as they are.
    #[must_use]
    pub fn new(api: Arc<dyn EduApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            summary: Loader::new(
                "admin-dashboard",
                LoadState::with_data(DashboardSummary::default()),
                FailurePolicy::LogOnly,
                notifier,
            ),
        }
    }

    /// Activate the view and fetch the summary once
    pub async fn mount(&self) -> LoadOutcome {
        self.summary.mount();
        self.refresh().await
    }

    /// Deactivate the view; in-flight responses are discarded
    pub fn unmount(&self) {
        self.summary.unmount();
    }

    /// Fetch the summary again
    pub async fn refresh(&self) -> LoadOutcome {
        let api = Arc::clone(&self.api);
        self.summary
            .load(|| async move { api.dashboard_summary().await })
            .await
    }

    /// Current loader state
    #[must_use]
    pub fn state(&self) -> LoadState<DashboardSummary> {
        self.summary.snapshot()
    }

    /// Subscribe to state transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<DashboardSummary>> {
        self.summary.subscribe()
    }

    /// The four counter tiles
    #[must_use]
    pub fn stat_cards(&self) -> Vec<StatCard> {
        let summary = self.summary.snapshot().data().cloned().unwrap_or_default();
        vec![
            StatCard {
                title: "Total users",
                value: summary.total_users,
                icon: "user",
                accent: "#3f8600",
            },
            StatCard {
                title: "Total resources",
                value: summary.total_resources,
                icon: "file-text",
                accent: "#1890ff",
            },
            StatCard {
                title: "Total exams",
                value: summary.total_exams,
                icon: "book",
                accent: "#722ed1",
            },
            StatCard {
                title: "Total videos",
                value: summary.total_videos,
                icon: "video-camera",
                accent: "#eb2f96",
            },
        ]
    }

    /// Recent activity table
    #[must_use]
    pub fn activity_table(&self) -> TableModel {
        let state = self.summary.snapshot();
        let rows = state
            .data()
            .map(|summary| {
                summary
                    .recent_activities
                    .iter()
                    .map(|record| {
                        vec![
                            Cell::text(record.time.clone().unwrap_or_default()),
                            Cell::text(record.user.clone().unwrap_or_default()),
                            Cell::text(record.activity.clone().unwrap_or_default()),
                        ]
                    })
                    .collect()
            })
            .unwrap_or_default();

        TableModel {
            columns: ACTIVITY_COLUMNS,
            rows,
            loading: state.is_busy(),
            empty_text: NO_ACTIVITY,
            total_label: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::notify::NotificationQueue;
    use crate::test_support::StubApi;
    use eduagi_core::ActivityRecord;
    use pretty_assertions::assert_eq;

    fn values(view: &AdminDashboardView) -> Vec<u64> {
        view.stat_cards().iter().map(|card| card.value).collect()
    }

    #[tokio::test]
    async fn test_counters_start_at_zero() {
        let view = AdminDashboardView::new(
            Arc::new(StubApi::default()),
            Arc::new(NotificationQueue::new()),
        );

        assert_eq!(values(&view), vec![0, 0, 0, 0]);
        assert!(view.activity_table().is_empty());
    }

    #[tokio::test]
    async fn test_mount_shows_summary() {
        let api = StubApi {
            summary: Ok(DashboardSummary {
                total_users: 12,
                total_resources: 4,
                total_exams: 2,
                total_videos: 1,
                recent_activities: vec![ActivityRecord {
                    time: Some("2024-01-15 09:30".into()),
                    user: Some("alice".into()),
                    activity: Some("uploaded a resource".into()),
                    ..ActivityRecord::default()
                }],
            }),
            ..StubApi::default()
        };
        let view = AdminDashboardView::new(Arc::new(api), Arc::new(NotificationQueue::new()));

        assert_eq!(view.mount().await, LoadOutcome::Applied);
        assert_eq!(values(&view), vec![12, 4, 2, 1]);

        let table = view.activity_table();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1].as_text(), "alice");
    }

    #[tokio::test]
    async fn test_failure_keeps_zeroes_without_notification() {
        let queue = NotificationQueue::new();
        let api = StubApi {
            summary: Err("unreachable".to_string()),
            ..StubApi::default()
        };
        let view = AdminDashboardView::new(Arc::new(api), Arc::new(queue.clone()));

        assert_eq!(view.mount().await, LoadOutcome::Failed);
        assert_eq!(values(&view), vec![0, 0, 0, 0]);
        assert!(!view.state().is_busy());
        assert!(queue.is_empty());
    }
}
