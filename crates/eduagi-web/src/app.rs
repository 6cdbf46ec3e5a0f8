//! Wiring from loaded configuration to ready-to-mount views

use crate::api_client::{ApiClient, EduApi};
use crate::notify::{Notifier, TracingNotifier};
use crate::shell::NavigationShell;
use crate::views::{AdminDashboardView, ResourcesView, TeacherDashboardView, VideoAnalysisView};
use eduagi_core::config::UiConfig;
use eduagi_core::{Config, Result, Role, SessionContext};
use std::sync::Arc;
use tracing::info;

/// Builds the shell and the pages of the dashboard client
///
/// Every view shares one API client, one session and one notifier.
/// Notifications go to the log until a UI installs its own sink with
/// [`App::with_notifier`].
#[derive(Debug, Clone)]
pub struct App {
    client: ApiClient,
    notifier: Arc<dyn Notifier>,
    ui: UiConfig,
}

impl App {
    /// Create the client for `config.api` and remember the view settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config, session: SessionContext) -> Result<Self> {
        let client = ApiClient::new(&config.api, session)?;
        info!(
            base_url = %config.api.base_url,
            refresh_delay_ms = config.ui.refresh_delay_ms,
            "dashboard client ready"
        );

        Ok(Self {
            client,
            notifier: Arc::new(TracingNotifier),
            ui: config.ui.clone(),
        })
    }

    /// Route notifications to `notifier` instead of the log
    #[must_use]
    pub fn with_notifier(self, notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier, ..self }
    }

    /// Shared API client
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Shared session
    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        self.client.session()
    }

    /// Shell matching the signed-in user's role
    ///
    /// Students have no dashboard shell; `None` also means nobody is signed in.
    #[must_use]
    pub fn shell(&self) -> Option<NavigationShell> {
        let session = self.session().clone();
        let notifier = Arc::clone(&self.notifier);
        match self.session().current_user()?.role {
            Role::Admin => Some(NavigationShell::admin(session, notifier)),
            Role::Teacher | Role::Other(_) => Some(NavigationShell::teacher(session, notifier)),
            Role::Student => None,
        }
    }

    /// Administrator dashboard
    #[must_use]
    pub fn admin_dashboard(&self) -> AdminDashboardView {
        AdminDashboardView::new(self.api(), Arc::clone(&self.notifier))
    }

    /// Teacher dashboard
    #[must_use]
    pub fn teacher_dashboard(&self) -> TeacherDashboardView {
        TeacherDashboardView::new(self.api(), Arc::clone(&self.notifier))
    }

    /// Own resources list
    #[must_use]
    pub fn resources(&self) -> ResourcesView {
        ResourcesView::new(self.api(), Arc::clone(&self.notifier))
    }

    /// Video analysis page, reloading after the configured delay
    #[must_use]
    pub fn video_analysis(&self) -> VideoAnalysisView {
        VideoAnalysisView::from_config(&self.ui, self.api(), Arc::clone(&self.notifier))
    }

    fn api(&self) -> Arc<dyn EduApi> {
        Arc::new(self.client.clone())
    }
}
