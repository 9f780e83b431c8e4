//! What to do when the server rejects the credential.

use crate::routes::Route;

/// Global reaction to an authentication failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Drop the session and stay on the current screen.
    ClearSession,
    /// Drop the session and move to `Route`.
    ClearSessionAndRedirect(Route),
}

impl AuthAction {
    pub fn redirect_target(&self) -> Option<&Route> {
        match self {
            AuthAction::ClearSession => None,
            AuthAction::ClearSessionAndRedirect(route) => Some(route),
        }
    }
}

/// Maps a response status to an [`AuthAction`].
///
/// Login and registration screens are exempt from the redirect so a wrong
/// password does not bounce the user off the form.
#[derive(Debug, Clone)]
pub struct AuthFailureHandler {
    redirect_to: Route,
}

impl Default for AuthFailureHandler {
    fn default() -> Self {
        Self {
            redirect_to: Route::Landing,
        }
    }
}

impl AuthFailureHandler {
    pub fn new(redirect_to: Route) -> Self {
        Self { redirect_to }
    }

    pub fn on_status(&self, status: u16, current: &Route) -> Option<AuthAction> {
        if status != 401 {
            return None;
        }
        if current.is_auth_screen() {
            Some(AuthAction::ClearSession)
        } else {
            Some(AuthAction::ClearSessionAndRedirect(self.redirect_to.clone()))
        }
    }
}
