//! Teacher dashboard

use super::dashboard::NO_ACTIVITY;
use super::{Cell, StatCard};
use crate::api_client::EduApi;
use crate::loader::{FailurePolicy, LoadOutcome, LoadState, Loader};
use crate::notify::Notifier;
use eduagi_core::{ActivityRecord, TeacherDashboard};
use std::sync::Arc;
use tokio::sync::watch;

/// One entry of the recent-activity list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityItem {
    /// Headline
    pub title: String,
    /// When it happened, as sent by the backend
    pub time: String,
    /// Kind label
    pub tag: Cell,
}

impl From<&ActivityRecord> for ActivityItem {
    fn from(record: &ActivityRecord) -> Self {
        let tag = match record.kind.as_deref() {
            Some("resource") => Cell::tag("Resource", "blue"),
            _ => Cell::tag("Activity", "green"),
        };
        Self {
            title: record
                .title
                .clone()
                .or_else(|| record.activity.clone())
                .unwrap_or_default(),
            time: record.time.clone().unwrap_or_default(),
            tag,
        }
    }
}

/// Render-ready recent-activity list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityList {
    /// Entries, in payload order
    pub items: Vec<ActivityItem>,
    /// Whether to show the loading overlay
    pub loading: bool,
    /// Text shown when there are no entries
    pub empty_text: &'static str,
}

impl ActivityList {
    /// Whether the list should show its empty text
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.loading && self.items.is_empty()
    }
}

/// Teacher landing page
#[derive(Clone)]
pub struct TeacherDashboardView {
    api: Arc<dyn EduApi>,
    dashboard: Loader<TeacherDashboard>,
}

impl std::fmt::Debug for TeacherDashboardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeacherDashboardView")
            .field("dashboard", &self.dashboard)
            .finish_non_exhaustive()
    }
}

impl TeacherDashboardView {
    /// Create the view with zeroed counters
    #[must_use]
    pub fn new(api: Arc<dyn EduApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            dashboard: Loader::new(
                "teacher-dashboard",
                LoadState::with_data(TeacherDashboard::default()),
                FailurePolicy::LogOnly,
                notifier,
            ),
        }
    }

    /// Activate the view and fetch once
    pub async fn mount(&self) -> LoadOutcome {
        self.dashboard.mount();
        self.refresh().await
    }

    /// Deactivate the view
    pub fn unmount(&self) {
        self.dashboard.unmount();
    }

    /// Fetch again
    pub async fn refresh(&self) -> LoadOutcome {
        let api = Arc::clone(&self.api);
        self.dashboard
            .load(|| async move { api.teacher_dashboard().await })
            .await
    }

    /// Current loader state
    #[must_use]
    pub fn state(&self) -> LoadState<TeacherDashboard> {
        self.dashboard.snapshot()
    }

    /// Subscribe to state transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<TeacherDashboard>> {
        self.dashboard.subscribe()
    }

    /// Counter tiles
    ///
    /// Course notes have no backend counter yet and always show zero.
    #[must_use]
    pub fn stat_cards(&self) -> Vec<StatCard> {
        let dashboard = self.dashboard.snapshot().data().cloned().unwrap_or_default();
        vec![
            StatCard {
                title: "My resources",
                value: dashboard.total_resources,
                icon: "file-text",
                accent: "#1890ff",
            },
            StatCard {
                title: "Video analyses",
                value: dashboard.total_videos,
                icon: "video-camera",
                accent: "#52c41a",
            },
            StatCard {
                title: "Students",
                value: dashboard.total_students,
                icon: "team",
                accent: "#722ed1",
            },
            StatCard {
                title: "Course notes",
                value: 0,
                icon: "book",
                accent: "#fa8c16",
            },
        ]
    }

    /// Recent activity, newest first as the backend orders it
    #[must_use]
    pub fn recent_activity(&self) -> ActivityList {
        let state = self.dashboard.snapshot();
        let items = state
            .data()
            .map(|dashboard| {
                dashboard
                    .recent_activities
                    .iter()
                    .map(ActivityItem::from)
                    .collect()
            })
            .unwrap_or_default();

        ActivityList {
            items,
            loading: state.is_busy(),
            empty_text: NO_ACTIVITY,
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::notify::NotificationQueue;
    use crate::test_support::StubApi;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_activity_tags() {
        let upload = ActivityRecord {
            title: Some("Uploaded slides".into()),
            time: Some("2024-03-01".into()),
            kind: Some("resource".into()),
            ..ActivityRecord::default()
        };
        let other = ActivityRecord {
            activity: Some("Graded exam".into()),
            kind: Some("exam".into()),
            ..ActivityRecord::default()
        };

        let upload = ActivityItem::from(&upload);
        assert_eq!(upload.tag, Cell::tag("Resource", "blue"));
        assert_eq!(upload.title, "Uploaded slides");

        let other = ActivityItem::from(&other);
        assert_eq!(other.tag, Cell::tag("Activity", "green"));
        assert_eq!(other.title, "Graded exam");
        assert_eq!(other.time, "");
    }

    #[tokio::test]
    async fn test_mount_fills_cards() {
        let api = StubApi {
            teacher: Ok(TeacherDashboard {
                total_resources: 7,
                total_videos: 3,
                total_students: 41,
                recent_activities: Vec::new(),
            }),
            ..StubApi::default()
        };
        let view = TeacherDashboardView::new(Arc::new(api), Arc::new(NotificationQueue::new()));

        assert_eq!(view.mount().await, LoadOutcome::Applied);
        let values: Vec<u64> = view.stat_cards().iter().map(|c| c.value).collect();
        assert_eq!(values, vec![7, 3, 41, 0]);
        let activity = view.recent_activity();
        assert!(activity.is_empty());
        assert_eq!(activity.empty_text, "No recent activity");
    }

    #[tokio::test]
    async fn test_recent_activity_keeps_payload_order() {
        let api = StubApi {
            teacher: Ok(TeacherDashboard {
                recent_activities: vec![
                    ActivityRecord {
                        title: Some("Uploaded slides".into()),
                        kind: Some("resource".into()),
                        ..ActivityRecord::default()
                    },
                    ActivityRecord {
                        activity: Some("Graded exam".into()),
                        ..ActivityRecord::default()
                    },
                ],
                ..TeacherDashboard::default()
            }),
            ..StubApi::default()
        };
        let view = TeacherDashboardView::new(Arc::new(api), Arc::new(NotificationQueue::new()));
        assert_eq!(view.mount().await, LoadOutcome::Applied);

        let activity = view.recent_activity();
        assert!(!activity.is_empty());
        let titles: Vec<&str> = activity.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Uploaded slides", "Graded exam"]);
    }
}
