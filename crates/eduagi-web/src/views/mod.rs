//! View models for the dashboard pages
//!
//! Each view owns its loaders and turns their state into render-ready
//! [`StatCard`]s and [`TableModel`]s. Drawing them is left to the UI toolkit.

pub mod dashboard;
pub mod resources;
pub mod teacher;
pub mod videos;

pub use dashboard::AdminDashboardView;
pub use resources::ResourcesView;
pub use teacher::{ActivityItem, ActivityList, TeacherDashboardView};
pub use videos::{SubmitOutcome, VideoAnalysisView};

/// A single statistic tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    /// Caption
    pub title: &'static str,
    /// Displayed value
    pub value: u64,
    /// Icon name
    pub icon: &'static str,
    /// Value color
    pub accent: &'static str,
}

/// Table column declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field the column reads
    pub key: &'static str,
    /// Header text
    pub title: &'static str,
    /// Fixed width in pixels, if any
    pub width: Option<u16>,
}

impl Column {
    const fn new(key: &'static str, title: &'static str, width: Option<u16>) -> Self {
        Self { key, title, width }
    }
}

/// Content of one table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Plain text
    Text(String),
    /// Colored label
    Tag {
        /// Label text
        text: String,
        /// Tag color
        color: &'static str,
    },
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn tag(text: impl Into<String>, color: &'static str) -> Self {
        Self::Tag {
            text: text.into(),
            color,
        }
    }

    /// Text shown in the cell, whatever its kind
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Tag { text, .. } => text,
        }
    }
}

/// Render-ready table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    /// Column declarations
    pub columns: &'static [Column],
    /// Rows, in payload order
    pub rows: Vec<Vec<Cell>>,
    /// Whether to show the loading overlay
    pub loading: bool,
    /// Text shown when there are no rows
    pub empty_text: &'static str,
    /// Pagination footer, e.g. "3 records"
    pub total_label: Option<String>,
}

impl TableModel {
    /// Whether the table should show its empty text
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.loading && self.rows.is_empty()
    }
}
