//! Current-screen tracking.
//!
//! The navigator is shared between the route guard, the gateway's auth
//! failure policy and the screens, so it is a cheap clonable handle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::routes::Route;

const HISTORY_LIMIT: usize = 32;

#[derive(Debug)]
struct NavState {
    current: Route,
    history: Vec<Route>,
    redirected: bool,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    inner: Arc<Mutex<NavState>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NavState {
                current: start,
                history: Vec::new(),
                redirected: false,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, NavState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Route {
        self.state().current.clone()
    }

    /// Moves to `route`, keeping the previous route in history.
    pub fn navigate(&self, route: Route) {
        let mut state = self.state();
        if state.current == route {
            return;
        }
        debug!(from = %state.current, to = %route, "navigate");
        let previous = std::mem::replace(&mut state.current, route);
        state.history.push(previous);
        if state.history.len() > HISTORY_LIMIT {
            state.history.remove(0);
        }
    }

    /// Replaces the current route without recording it in history.
    ///
    /// Redirecting to the route already shown is a no-op apart from
    /// marking the navigator as redirected.
    pub fn redirect(&self, route: Route) {
        let mut state = self.state();
        state.redirected = true;
        if state.current != route {
            debug!(from = %state.current, to = %route, "redirect");
            state.current = route;
        }
    }

    /// Whether any redirect happened since creation (or the last `take_redirect`).
    pub fn was_redirected(&self) -> bool {
        self.state().redirected
    }

    /// Returns and clears the redirect flag.
    pub fn take_redirect(&self) -> bool {
        std::mem::take(&mut self.state().redirected)
    }

    pub fn history(&self) -> Vec<Route> {
        self.state().history.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_records_history() {
        let nav = Navigator::default();
        nav.navigate(Route::PatientLogin);
        nav.navigate(Route::PatientDashboard);

        assert_eq!(nav.current(), Route::PatientDashboard);
        assert_eq!(nav.history(), vec![Route::Landing, Route::PatientLogin]);
        assert!(!nav.was_redirected());
    }

    #[test]
    fn test_redirect_replaces_without_history() {
        let nav = Navigator::new(Route::DoctorSlots);
        nav.redirect(Route::Landing);

        assert_eq!(nav.current(), Route::Landing);
        assert!(nav.history().is_empty());
        assert!(nav.take_redirect());
        assert!(!nav.was_redirected());
    }

    #[test]
    fn test_repeated_redirect_is_harmless() {
        let nav = Navigator::new(Route::DoctorSlots);
        nav.redirect(Route::Landing);
        nav.redirect(Route::Landing);
        assert_eq!(nav.current(), Route::Landing);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let nav = Navigator::default();
        let other = nav.clone();
        other.navigate(Route::AdminLogin);
        assert_eq!(nav.current(), Route::AdminLogin);
    }
}
