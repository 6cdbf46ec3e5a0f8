//! Resource loader: fetch a payload into view state
//!
//! A view owns one [`Loader`] per data source. The loader keeps a
//! [`LoadState`] value that only changes through [`LoadState::begin`],
//! [`LoadState::settle_ok`], [`LoadState::settle_err`] and
//! [`LoadState::abandon`]. Every transition is published on a `watch` channel
//! so any renderer can subscribe.
//!
//! Responses belonging to a superseded request (an older generation) are
//! dropped. Responses arriving after [`Loader::unmount`] are dropped too.

use crate::notify::Notifier;
use eduagi_core::{DashboardSummary, Result, TeacherDashboard};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::{debug, error, warn};

/// Payload a loader can hold
pub trait ViewData: Clone + Send + Sync + 'static {
    /// Whether the payload should render as the empty state
    fn is_blank(&self) -> bool {
        false
    }
}

impl<T: Clone + Send + Sync + 'static> ViewData for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl ViewData for DashboardSummary {}

impl ViewData for TeacherDashboard {}

/// What a view renders, derived from [`LoadState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A request is in flight
    Loading,
    /// Nothing to show
    Empty,
    /// Data is shown
    Populated,
    /// The last request failed
    Error,
}

/// Proof that a request was started against a given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// Immutable snapshot of a view's fetch state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadState<T> {
    data: Option<T>,
    busy: bool,
    error: Option<String>,
    generation: u64,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            data: None,
            busy: false,
            error: None,
            generation: 0,
        }
    }
}

impl<T: ViewData> LoadState<T> {
    /// State with no data yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded with placeholder data, e.g. zeroed counters
    #[must_use]
    pub fn with_data(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Start a request: raise the busy flag and open a new generation
    #[must_use]
    pub fn begin(self) -> (Self, Ticket) {
        let generation = self.generation + 1;
        (
            Self {
                busy: true,
                generation,
                ..self
            },
            Ticket { generation },
        )
    }

    /// Whether `ticket` belongs to the newest request
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a successful response: replace data wholesale and clear busy
    ///
    /// A superseded ticket leaves the state untouched.
    #[must_use]
    pub fn settle_ok(self, ticket: Ticket, data: T) -> Self {
        if !self.is_current(ticket) {
            return self;
        }
        Self {
            data: Some(data),
            busy: false,
            error: None,
            generation: self.generation,
        }
    }

    /// Apply a failure: keep data, clear busy, record `error` if given
    ///
    /// A superseded ticket leaves the state untouched.
    #[must_use]
    pub fn settle_err(self, ticket: Ticket, error: Option<String>) -> Self {
        if !self.is_current(ticket) {
            return self;
        }
        Self {
            busy: false,
            error,
            ..self
        }
    }

    /// Drop the in-flight request: clear busy and invalidate outstanding tickets
    #[must_use]
    pub fn abandon(self) -> Self {
        Self {
            busy: false,
            generation: self.generation + 1,
            ..self
        }
    }

    /// Phase to render
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.data.as_ref().is_none_or(ViewData::is_blank) {
            Phase::Empty
        } else {
            Phase::Populated
        }
    }

    /// Retained data, whatever the phase
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Data to display; `None` unless the phase is [`Phase::Populated`]
    #[must_use]
    pub fn visible(&self) -> Option<&T> {
        match self.phase() {
            Phase::Populated => self.data.as_ref(),
            _ => None,
        }
    }

    /// Busy flag
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Message of the last failure, if it is still active
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of requests started so far
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// How a loader reacts to a failed fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Show this message as an error notification and enter the error phase
    Notify(String),
    /// Log and keep showing the current data
    LogOnly,
}

/// Result of one [`Loader::load`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The payload replaced the view's data
    Applied,
    /// The fetch failed and the failure policy ran
    Failed,
    /// A newer request started meanwhile; the response was dropped
    Superseded,
    /// The view was not mounted; nothing changed
    Detached,
}

#[derive(Debug)]
struct LoaderInner<T> {
    name: &'static str,
    state: watch::Sender<LoadState<T>>,
    mounted: AtomicBool,
    notifier: Arc<dyn Notifier>,
    policy: FailurePolicy,
}

/// Loads one data source into view state
#[derive(Debug)]
pub struct Loader<T> {
    inner: Arc<LoaderInner<T>>,
}

impl<T> Clone for Loader<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ViewData> Loader<T> {
    /// Create a mounted loader
    #[must_use]
    pub fn new(
        name: &'static str,
        initial: LoadState<T>,
        policy: FailurePolicy,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(LoaderInner {
                name,
                state,
                mounted: AtomicBool::new(true),
                notifier,
                policy,
            }),
        }
    }

    /// Subscribe to state transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<T>> {
        self.inner.state.subscribe()
    }

    /// Current state
    #[must_use]
    pub fn snapshot(&self) -> LoadState<T> {
        self.inner.state.borrow().clone()
    }

    /// Busy flag of the current state
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.inner.state.borrow().is_busy()
    }

    /// Mark the owning view active again
    pub fn mount(&self) {
        self.inner.mounted.store(true, Ordering::Release);
    }

    /// Mark the owning view gone; later settles become no-ops
    ///
    /// A request still in flight is abandoned, so the busy flag does not
    /// survive a remount.
    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::Release);
        if self.is_busy() {
            debug!(loader = self.inner.name, "in-flight request abandoned");
            self.transition(LoadState::abandon);
        }
    }

    /// Whether the owning view is active
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::Acquire)
    }

    /// Run `fetch` and fold its result into the view state
    pub async fn load<F, Fut>(&self, fetch: F) -> LoadOutcome
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
    {
        if !self.is_mounted() {
            debug!(loader = self.inner.name, "load skipped: view not mounted");
            return LoadOutcome::Detached;
        }

        let ticket = self.begin();
        let result = fetch().await;

        if !self.is_mounted() {
            debug!(loader = self.inner.name, "response dropped: view unmounted");
            return LoadOutcome::Detached;
        }
        if !self.inner.state.borrow().is_current(ticket) {
            debug!(loader = self.inner.name, "response dropped: superseded");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(data) => {
                self.transition(|state| state.settle_ok(ticket, data));
                LoadOutcome::Applied
            }
            Err(e) => {
                let recorded = match &self.inner.policy {
                    FailurePolicy::Notify(message) => {
                        warn!(loader = self.inner.name, error = %e, "fetch failed");
                        self.inner.notifier.error(message);
                        Some(message.clone())
                    }
                    FailurePolicy::LogOnly => {
                        error!(loader = self.inner.name, error = %e, "fetch failed");
                        None
                    }
                };
                self.transition(|state| state.settle_err(ticket, recorded));
                LoadOutcome::Failed
            }
        }
    }

    fn begin(&self) -> Ticket {
        let mut ticket = None;
        self.inner.state.send_modify(|state| {
            let (next, issued) = std::mem::take(state).begin();
            *state = next;
            ticket = Some(issued);
        });
        ticket.unwrap_or(Ticket { generation: 0 })
    }

    fn transition(&self, apply: impl FnOnce(LoadState<T>) -> LoadState<T>) {
        self.inner.state.send_modify(|state| {
            *state = apply(std::mem::take(state));
        });
    }
}

#[cfg(test)]
#[allow(
    clippy::missing_panics_doc,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::notify::{NotificationLevel, NotificationQueue};
    use eduagi_core::Error;
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    fn list_loader(queue: &NotificationQueue) -> Loader<Vec<u32>> {
        Loader::new(
            "numbers",
            LoadState::new(),
            FailurePolicy::Notify("Failed to load numbers".to_string()),
            Arc::new(queue.clone()),
        )
    }

    #[test]
    fn test_phase_is_exclusive() {
        let state: LoadState<Vec<u32>> = LoadState::new();
        assert_eq!(state.phase(), Phase::Empty);

        let (state, ticket) = state.begin();
        assert_eq!(state.phase(), Phase::Loading);
        assert!(state.visible().is_none());

        let state = state.settle_ok(ticket, vec![1, 2]);
        assert_eq!(state.phase(), Phase::Populated);
        assert_eq!(state.visible(), Some(&vec![1, 2]));

        let (state, ticket) = state.begin();
        let state = state.settle_err(ticket, Some("boom".into()));
        assert_eq!(state.phase(), Phase::Error);
        assert!(state.visible().is_none());
        assert_eq!(state.data(), Some(&vec![1, 2]));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let (state, first) = LoadState::<Vec<u32>>::new().begin();
        let (state, second) = state.begin();

        let state = state.settle_ok(first, vec![9]);
        assert!(state.is_busy());
        assert!(state.data().is_none());

        let state = state.settle_ok(second, vec![1]);
        assert!(!state.is_busy());
        assert_eq!(state.data(), Some(&vec![1]));
        assert_eq!(state.generation(), 2);
    }

    #[tokio::test]
    async fn test_success_replaces_data_in_order() {
        let queue = NotificationQueue::new();
        let loader = list_loader(&queue);

        let outcome = loader.load(|| async { Ok(vec![3, 1, 2]) }).await;
        assert_eq!(outcome, LoadOutcome::Applied);

        let outcome = loader.load(|| async { Ok(vec![7]) }).await;
        assert_eq!(outcome, LoadOutcome::Applied);

        let state = loader.snapshot();
        assert_eq!(state.data(), Some(&vec![7]));
        assert!(!state.is_busy());
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_data_and_clears_busy() {
        let queue = NotificationQueue::new();
        let loader = list_loader(&queue);
        loader.load(|| async { Ok(vec![1, 2, 3]) }).await;

        let outcome = loader
            .load(|| async { Err(Error::network("connection refused")) })
            .await;

        assert_eq!(outcome, LoadOutcome::Failed);
        let state = loader.snapshot();
        assert_eq!(state.data(), Some(&vec![1, 2, 3]));
        assert!(!state.is_busy());
        assert_eq!(state.error(), Some("Failed to load numbers"));

        let notifications = queue.drain();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn test_log_only_keeps_default_values() {
        let queue = NotificationQueue::new();
        let loader = Loader::new(
            "summary",
            LoadState::with_data(DashboardSummary::default()),
            FailurePolicy::LogOnly,
            Arc::new(queue.clone()),
        );

        let outcome = loader.load(|| async { Err(Error::api(500, "boom")) }).await;

        assert_eq!(outcome, LoadOutcome::Failed);
        let state = loader.snapshot();
        assert_eq!(state.phase(), Phase::Populated);
        assert_eq!(state.visible(), Some(&DashboardSummary::default()));
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_busy_while_in_flight() {
        let queue = NotificationQueue::new();
        let loader = list_loader(&queue);
        let (tx, rx) = oneshot::channel::<Vec<u32>>();

        let task = {
            let loader = loader.clone();
            tokio::spawn(async move {
                loader
                    .load(|| async move { rx.await.map_err(|e| Error::network(e.to_string())) })
                    .await
            })
        };

        let mut updates = loader.subscribe();
        updates.wait_for(LoadState::is_busy).await.unwrap();
        assert_eq!(loader.snapshot().phase(), Phase::Loading);

        tx.send(vec![5]).unwrap();
        assert_eq!(task.await.unwrap(), LoadOutcome::Applied);
        assert!(!loader.is_busy());
    }

    #[tokio::test]
    async fn test_superseded_response_is_dropped() {
        let queue = NotificationQueue::new();
        let loader = list_loader(&queue);
        let (slow_tx, slow_rx) = oneshot::channel::<Vec<u32>>();

        let slow = {
            let loader = loader.clone();
            tokio::spawn(async move {
                loader
                    .load(|| async move {
                        slow_rx.await.map_err(|e| Error::network(e.to_string()))
                    })
                    .await
            })
        };
        loader.subscribe().wait_for(LoadState::is_busy).await.unwrap();

        let fast = loader.load(|| async { Ok(vec![2]) }).await;
        assert_eq!(fast, LoadOutcome::Applied);

        slow_tx.send(vec![1]).unwrap();
        assert_eq!(slow.await.unwrap(), LoadOutcome::Superseded);
        assert_eq!(loader.snapshot().data(), Some(&vec![2]));
    }

    #[tokio::test]
    async fn test_unmounted_settle_is_noop() {
        let queue = NotificationQueue::new();
        let loader = list_loader(&queue);
        let (tx, rx) = oneshot::channel::<Vec<u32>>();

        let task = {
            let loader = loader.clone();
            tokio::spawn(async move {
                loader
                    .load(|| async move { rx.await.map_err(|e| Error::network(e.to_string())) })
                    .await
            })
        };
        loader.subscribe().wait_for(LoadState::is_busy).await.unwrap();

        loader.unmount();
        tx.send(vec![1]).unwrap();

        assert_eq!(task.await.unwrap(), LoadOutcome::Detached);
        assert!(loader.snapshot().data().is_none());
        assert_eq!(
            loader.load(|| async { Ok(vec![4]) }).await,
            LoadOutcome::Detached
        );
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_remount_after_in_flight_unmount_is_idle() {
        let queue = NotificationQueue::new();
        let loader = list_loader(&queue);
        let (tx, rx) = oneshot::channel::<Vec<u32>>();

        let task = {
            let loader = loader.clone();
            tokio::spawn(async move {
                loader
                    .load(|| async move { rx.await.map_err(|e| Error::network(e.to_string())) })
                    .await
            })
        };
        loader.subscribe().wait_for(LoadState::is_busy).await.unwrap();

        loader.unmount();
        loader.mount();
        assert!(!loader.is_busy());
        assert_eq!(loader.snapshot().phase(), Phase::Empty);

        // The abandoned response must not land on the remounted view
        tx.send(vec![1]).unwrap();
        assert_eq!(task.await.unwrap(), LoadOutcome::Superseded);
        assert!(loader.snapshot().data().is_none());

        assert_eq!(loader.load(|| async { Ok(vec![3]) }).await, LoadOutcome::Applied);
        assert_eq!(loader.snapshot().data(), Some(&vec![3]));
    }
}
