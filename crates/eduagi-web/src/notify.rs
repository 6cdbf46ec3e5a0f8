//! Transient user notifications (toasts)

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

/// One transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Text shown to the user
    pub message: String,
}

impl Notification {
    /// Build a success notification
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Build an error notification
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Sink that surfaces notifications to the user
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Show a notification
    fn notify(&self, notification: Notification);

    /// Show a success notification
    fn success(&self, message: &str) {
        self.notify(Notification::success(message));
    }

    /// Show an error notification
    fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }
}

/// Notifier for headless use: writes every notification to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => warn!(message = %notification.message, "notification"),
            NotificationLevel::Success => info!(message = %notification.message, "notification"),
        }
    }
}

/// Queue a UI drains to render toasts
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    pending: Arc<Mutex<VecDeque<Notification>>>,
}

impl NotificationQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notification, oldest first
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        self.pending.lock().drain(..).collect()
    }

    /// Number of notifications not yet drained
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Most recent notification, without removing it
    #[must_use]
    pub fn last(&self) -> Option<Notification> {
        self.pending.lock().back().cloned()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        self.pending.lock().push_back(notification);
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_queue_keeps_order() {
        let queue = NotificationQueue::new();
        queue.success("saved");
        queue.error("failed");

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.last().unwrap().level, NotificationLevel::Error);

        let drained = queue.drain();
        assert_eq!(
            drained,
            vec![Notification::success("saved"), Notification::error("failed")]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_clones_share_storage() {
        let queue = NotificationQueue::new();
        let as_notifier: Arc<dyn Notifier> = Arc::new(queue.clone());

        as_notifier.error("boom");
        assert_eq!(queue.drain(), vec![Notification::error("boom")]);
    }
}
