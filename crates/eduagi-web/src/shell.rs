//! Navigation shell: sidebar menu, header and logout
//!
//! Menu keys are the routes they lead to, so selecting an entry and changing
//! the route are the same operation.

use crate::guard::LOGIN_ROUTE;
use crate::notify::Notifier;
use eduagi_core::{Error, Result, SessionContext};
use std::sync::Arc;
use tracing::{debug, info};

/// One sidebar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    /// Route the entry leads to
    pub key: &'static str,
    /// Icon name
    pub icon: &'static str,
    /// Text shown in the menu and the header
    pub label: &'static str,
}

const fn entry(key: &'static str, icon: &'static str, label: &'static str) -> MenuEntry {
    MenuEntry { key, icon, label }
}

/// Administrator menu
pub const ADMIN_MENU: &[MenuEntry] = &[
    entry("/admin/dashboard", "dashboard", "Dashboard"),
    entry("/admin/users", "user", "Users"),
    entry("/admin/classes", "team", "Classes"),
    entry("/admin/resources", "file-text", "Resources"),
    entry("/admin/videos", "video-camera", "Video analysis"),
    entry("/admin/analytics", "bar-chart", "Analytics"),
    entry("/admin/settings", "setting", "Settings"),
];

/// Teacher menu
pub const TEACHER_MENU: &[MenuEntry] = &[
    entry("/teacher/dashboard", "dashboard", "Dashboard"),
    entry("/teacher/teaching-plans", "bulb", "Teaching plans"),
    entry("/teacher/mindmaps", "share-alt", "Knowledge maps"),
    entry("/teacher/exam-generator", "file-text", "Exam generator"),
    entry("/teacher/videos", "video-camera", "Videos"),
    entry("/teacher/settings", "setting", "Profile settings"),
];

/// Notification shown after logout
pub const LOGGED_OUT: &str = "Logged out";

/// Persistent frame around every view
#[derive(Debug)]
pub struct NavigationShell {
    menu: &'static [MenuEntry],
    route: String,
    collapsed: bool,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
}

impl NavigationShell {
    /// Shell with an arbitrary menu, starting on its first entry
    #[must_use]
    pub fn new(
        menu: &'static [MenuEntry],
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let route = menu.first().map_or(LOGIN_ROUTE, |e| e.key).to_string();
        Self {
            menu,
            route,
            collapsed: false,
            session,
            notifier,
        }
    }

    /// Administrator shell
    #[must_use]
    pub fn admin(session: SessionContext, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(ADMIN_MENU, session, notifier)
    }

    /// Teacher shell
    #[must_use]
    pub fn teacher(session: SessionContext, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(TEACHER_MENU, session, notifier)
    }

    /// Menu entries in display order
    #[must_use]
    pub const fn menu(&self) -> &'static [MenuEntry] {
        self.menu
    }

    /// Select a menu entry; the route becomes exactly its key
    ///
    /// # Errors
    ///
    /// Returns a validation error if `key` is not in the menu.
    pub fn select(&mut self, key: &str) -> Result<&'static MenuEntry> {
        let entry = self
            .menu
            .iter()
            .find(|e| e.key == key)
            .ok_or_else(|| Error::validation("menu", format!("unknown menu entry '{key}'")))?;
        debug!(route = entry.key, "menu selection");
        self.route = entry.key.to_string();
        Ok(entry)
    }

    /// Follow a route that did not come from the menu, e.g. a redirect
    pub fn navigate_to(&mut self, route: impl Into<String>) {
        self.route = route.into();
    }

    /// Route currently shown
    #[must_use]
    pub fn active_route(&self) -> &str {
        &self.route
    }

    /// Keys rendered as selected; at most one
    #[must_use]
    pub fn selected_keys(&self) -> Vec<&'static str> {
        self.active_entry().map(|e| e.key).into_iter().collect()
    }

    /// Collapse or expand the sidebar
    pub const fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Whether the sidebar is collapsed
    #[must_use]
    pub const fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Sidebar logo
    #[must_use]
    pub const fn logo_text(&self) -> &'static str {
        if self.collapsed { "EA" } else { "EduAGI" }
    }

    /// Header title: the active entry's label, else the dashboard label
    #[must_use]
    pub fn page_title(&self) -> &'static str {
        self.active_entry()
            .or_else(|| self.menu.first())
            .map_or("Dashboard", |e| e.label)
    }

    /// Greeting in the header
    #[must_use]
    pub fn welcome_text(&self) -> String {
        self.session
            .current_user()
            .map_or_else(|| "Welcome".to_string(), |u| format!("Welcome, {}", u.display_name))
    }

    /// Clear the session and go to the login page, whatever the current route
    pub fn logout(&mut self) {
        info!(from = %self.route, "logout");
        self.session.logout();
        self.notifier.success(LOGGED_OUT);
        self.route = LOGIN_ROUTE.to_string();
    }

    fn active_entry(&self) -> Option<&'static MenuEntry> {
        self.menu.iter().find(|e| e.key == self.route)
    }
}
