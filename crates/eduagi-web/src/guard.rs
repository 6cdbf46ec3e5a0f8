//! Route guard: decides whether a path renders or redirects

use eduagi_core::SessionContext;
use tracing::debug;

/// Where unauthenticated users are sent
pub const LOGIN_ROUTE: &str = "/login";

const SECTIONS: &[&str] = &["/admin", "/teacher", "/student"];

/// Outcome of [`resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Show the view bound to this path
    Render(String),
    /// Go to this path instead
    Redirect(String),
}

/// Decide what to do with a requested path for the current session
#[must_use]
pub fn resolve(path: &str, session: &SessionContext) -> RouteDecision {
    let path = normalize(path);
    let home = session
        .current_user()
        .map(|user| user.role.dashboard_route());

    let decision = decide(path, home);
    debug!(path, ?decision, "route resolved");
    decision
}

fn decide(path: &str, home: Option<&str>) -> RouteDecision {
    if path == LOGIN_ROUTE {
        return home.map_or_else(
            || RouteDecision::Render(LOGIN_ROUTE.to_string()),
            |route| RouteDecision::Redirect(route.to_string()),
        );
    }
    if let Some(section) = SECTIONS.iter().find(|s| **s == path) {
        return RouteDecision::Redirect(format!("{section}/dashboard"));
    }
    if SECTIONS.iter().any(|s| is_under(path, s)) && home.is_some() {
        return RouteDecision::Render(path.to_string());
    }
    // Unknown paths, or a guarded section without a session
    RouteDecision::Redirect(home.unwrap_or(LOGIN_ROUTE).to_string())
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn is_under(path: &str, section: &str) -> bool {
    path.strip_prefix(section)
        .is_some_and(|rest| rest.starts_with('/'))
}
