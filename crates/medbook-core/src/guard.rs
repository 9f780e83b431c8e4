//! Route guard: decides whether the current identity may see a screen.
//!
//! Advisory only; the server authorizes every call on its own.

use tracing::warn;

use crate::api::types::Role;
use crate::navigation::Navigator;
use crate::routes::Route;
use crate::session::{Session, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render(Route),
    Redirect(Route),
}

/// Checks `session` against the roles required for `requested`.
///
/// No session, no role, or a role outside `required` redirects to the
/// landing route. An empty `required` set means the route is public.
pub fn authorize(session: &Session, requested: &Route, required: &[Role]) -> GuardDecision {
    if required.is_empty() {
        return GuardDecision::Render(requested.clone());
    }
    match session.role() {
        Some(role) if session.is_active() && required.contains(&role) => {
            GuardDecision::Render(requested.clone())
        }
        _ => GuardDecision::Redirect(Route::Landing),
    }
}

/// Applies [`authorize`] to navigations, using the static route table.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionStore,
    navigator: Navigator,
}

impl RouteGuard {
    pub fn new(session: SessionStore, navigator: Navigator) -> Self {
        Self { session, navigator }
    }

    /// Navigates to `route` if allowed, otherwise redirects.
    pub fn enter(&self, route: Route) -> GuardDecision {
        let session = self.session.snapshot();
        let decision = authorize(&session, &route, route.required_roles());
        match &decision {
            GuardDecision::Render(target) => self.navigator.navigate(target.clone()),
            GuardDecision::Redirect(target) => {
                warn!(
                    requested = %route,
                    role = ?session.role(),
                    "access denied, redirecting to {target}"
                );
                self.navigator.redirect(target.clone());
            }
        }
        decision
    }
}
