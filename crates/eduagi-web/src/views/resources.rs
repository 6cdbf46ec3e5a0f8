//! Teaching resources owned by the signed-in teacher

use super::{Cell, Column, TableModel};
use crate::api_client::EduApi;
use crate::loader::{FailurePolicy, LoadOutcome, LoadState, Loader};
use crate::notify::Notifier;
use eduagi_core::ResourceRecord;
use std::sync::Arc;
use tokio::sync::watch;

const RESOURCE_COLUMNS: &[Column] = &[
    Column::new("id", "ID", Some(80)),
    Column::new("title", "Title", None),
    Column::new("description", "Description", None),
    Column::new("file_type", "File type", Some(100)),
    Column::new("created_at", "Created", Some(180)),
];

/// Notification shown when the list cannot be fetched
pub const LOAD_FAILED: &str = "Failed to load resources";

/// "My resources" page
#[derive(Clone)]
pub struct ResourcesView {
    api: Arc<dyn EduApi>,
    resources: Loader<Vec<ResourceRecord>>,
}

impl std::fmt::Debug for ResourcesView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcesView")
            .field("resources", &self.resources)
            .finish_non_exhaustive()
    }
}

impl ResourcesView {
    /// Create an empty view
    #[must_use]
    pub fn new(api: Arc<dyn EduApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            resources: Loader::new(
                "my-resources",
                LoadState::new(),
                FailurePolicy::Notify(LOAD_FAILED.to_string()),
                notifier,
            ),
        }
    }

    /// Activate the view and fetch once
    pub async fn mount(&self) -> LoadOutcome {
        self.resources.mount();
        self.refresh().await
    }

    /// Deactivate the view
    pub fn unmount(&self) {
        self.resources.unmount();
    }

    /// Fetch the list again
    pub async fn refresh(&self) -> LoadOutcome {
        let api = Arc::clone(&self.api);
        self.resources
            .load(|| async move { api.my_resources().await })
            .await
    }

    /// Current loader state
    #[must_use]
    pub fn state(&self) -> LoadState<Vec<ResourceRecord>> {
        self.resources.snapshot()
    }

    /// Subscribe to state transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<Vec<ResourceRecord>>> {
        self.resources.subscribe()
    }

    /// Resource table
    ///
    /// Rows are only present in the populated phase.
    #[must_use]
    pub fn table(&self) -> TableModel {
        let state = self.resources.snapshot();
        let records = state.visible().map_or(&[][..], Vec::as_slice);

        TableModel {
            columns: RESOURCE_COLUMNS,
            rows: records.iter().map(row).collect(),
            loading: state.is_busy(),
            empty_text: "No resources yet",
            total_label: Some(format!("{} records", records.len())),
        }
    }
}

fn row(record: &ResourceRecord) -> Vec<Cell> {
    let description = record
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("-");

    vec![
        Cell::text(record.id.to_string()),
        Cell::text(record.title.clone()),
        Cell::text(description),
        Cell::tag(record.file_type.to_uppercase(), "blue"),
        Cell::text(record.created_at.display()),
    ]
}
